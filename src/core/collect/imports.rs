//! Per-file import table.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::core::parsers::go::{ParsedGoFile, node_text};
use crate::utils::go_package_name;

/// How a file refers to an imported package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportName {
    /// `bun.X` (default package name or explicit alias)
    Named(String),
    /// `import . "pkg"`: members are used unqualified
    Dot,
}

/// Import statements of a single file.
#[derive(Debug, Clone, Default)]
pub struct FileImports {
    /// local name → import path
    names: HashMap<String, String>,
    dot_imports: Vec<String>,
}

impl FileImports {
    /// Collect the import declarations of a file.
    ///
    /// Blank imports (`import _ "pkg"`) introduce no name and are skipped.
    pub fn collect(file: &ParsedGoFile) -> Self {
        let source = file.source.as_bytes();
        let root = file.tree.root_node();
        let mut imports = Self::default();

        let mut cursor = root.walk();
        for decl in root.named_children(&mut cursor) {
            if decl.kind() != "import_declaration" {
                continue;
            }
            let mut decl_cursor = decl.walk();
            for child in decl.named_children(&mut decl_cursor) {
                match child.kind() {
                    "import_spec" => imports.add_spec(child, source),
                    "import_spec_list" => {
                        let mut list_cursor = child.walk();
                        for spec in child.named_children(&mut list_cursor) {
                            if spec.kind() == "import_spec" {
                                imports.add_spec(spec, source);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        imports
    }

    fn add_spec(&mut self, spec: Node, source: &[u8]) {
        let Some(path_node) = spec.child_by_field_name("path") else {
            return;
        };
        let path = node_text(path_node, source)
            .trim_matches(|c| c == '"' || c == '`')
            .to_string();
        if path.is_empty() {
            return;
        }

        match spec.child_by_field_name("name") {
            Some(name) if name.kind() == "dot" => self.dot_imports.push(path),
            Some(name) if name.kind() == "blank_identifier" => {}
            Some(name) => {
                self.names.insert(node_text(name, source).to_string(), path);
            }
            None => {
                self.names.insert(go_package_name(&path), path);
            }
        }
    }

    /// Import path bound to a local package name.
    pub fn path_of(&self, name: &str) -> Option<&str> {
        self.names.get(name).map(String::as_str)
    }

    pub fn dot_imports(&self) -> &[String] {
        &self.dot_imports
    }

    /// How this file refers to `path`, if it imports it at all.
    pub fn local_name_of(&self, path: &str) -> Option<ImportName> {
        if self.dot_imports.iter().any(|p| p == path) {
            return Some(ImportName::Dot);
        }
        self.names
            .iter()
            .filter(|(_, p)| p.as_str() == path)
            .map(|(name, _)| name)
            .min()
            .map(|name| ImportName::Named(name.clone()))
    }
}
