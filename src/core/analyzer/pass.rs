use anyhow::Result;
use tracing::{debug, trace};
use tree_sitter::Node;

use super::classify::{Classification, classify};
use super::synthesize::synthesize;
use super::{Analyzer, Diagnostic};
use crate::core::collect::FileImports;
use crate::core::parsers::go::ParsedGoFile;
use crate::core::types::TypeInfo;

/// Per-file results of the earlier phases.
pub struct FileInput<'a> {
    pub file: &'a ParsedGoFile,
    pub imports: &'a FileImports,
    pub types: &'a TypeInfo,
}

/// Classify every call expression of a file, in document order.
///
/// Errors only when a fix cannot be synthesized for a violating call, which
/// means the syntax tree and the source disagree.
pub fn run(analyzer: &Analyzer, input: &FileInput) -> Result<Vec<Diagnostic>> {
    let source = input.file.source.as_bytes();
    let mut diagnostics = Vec::new();

    for call in call_expressions(input.file.tree.root_node()) {
        match classify(call, analyzer, input.types, source) {
            Classification::Violating { receiver } => {
                let diagnostic =
                    synthesize(call, receiver, analyzer, input.imports, &input.file.source)?;
                let (line, col) = input.file.line_col(diagnostic.position);
                debug!(file = %input.file.file_path, line, col, "unguarded update");
                diagnostics.push(diagnostic);
            }
            Classification::Compliant => {
                trace!(
                    file = %input.file.file_path,
                    offset = call.start_byte(),
                    "update routed through wrapper"
                );
            }
            Classification::NotApplicable => {}
        }
    }

    Ok(diagnostics)
}

/// `call_expression` nodes in pre-order, so an outer call precedes the calls in its receiver.
fn call_expressions(root: Node) -> Vec<Node> {
    let mut calls = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "call_expression" {
            calls.push(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return calls;
            }
        }
    }
}
