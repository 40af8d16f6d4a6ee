//! Call-site classification.
//!
//! Two strategies decide whether `receiver.Exec(...)` executes an unguarded
//! update:
//!
//! - **types**: the receiver's resolved static type is `*bun.UpdateQuery`
//! - **chain**: the method names along the receiver chain contain `NewUpdate`
//!   but not `WithOptimistic`
//!
//! Marker order is not checked by the chain strategy.

use smallvec::SmallVec;
use tree_sitter::Node;

use super::{Analyzer, Strategy};
use crate::core::parsers::go::node_text;
use crate::core::types::{FullName, TypeInfo};

/// Method names of a call chain, read left to right.
pub type MethodChain = SmallVec<[String; 8]>;

/// Verdict for a single call expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'t> {
    /// Unguarded update. `receiver` is the expression the wrapper must enclose.
    Violating { receiver: Node<'t> },
    /// Update already routed through the wrapper.
    Compliant,
    /// Not an update execution, or nothing could be proven.
    NotApplicable,
}

pub fn classify<'t>(
    call: Node<'t>,
    analyzer: &Analyzer,
    info: &TypeInfo,
    source: &[u8],
) -> Classification<'t> {
    match analyzer.strategy {
        Strategy::Types => classify_by_types(call, analyzer, info, source),
        Strategy::Chain => classify_by_chain(call, analyzer, source),
    }
}

/// Classify by the resolved type of the `Exec` receiver.
pub fn classify_by_types<'t>(
    call: Node<'t>,
    analyzer: &Analyzer,
    info: &TypeInfo,
    source: &[u8],
) -> Classification<'t> {
    let Some(receiver) = execute_receiver(call, &analyzer.execute, source) else {
        return Classification::NotApplicable;
    };

    if is_wrapper_call(receiver, analyzer, info) {
        return Classification::Compliant;
    }

    match info.type_of(receiver) {
        Some(ty) if ty.is_pointer_to(&analyzer.builder_type) => {
            Classification::Violating { receiver }
        }
        _ => Classification::NotApplicable,
    }
}

/// Classify by the method names along the call chain.
pub fn classify_by_chain<'t>(
    call: Node<'t>,
    analyzer: &Analyzer,
    source: &[u8],
) -> Classification<'t> {
    let Some(receiver) = execute_receiver(call, &analyzer.execute, source) else {
        return Classification::NotApplicable;
    };

    let chain = method_chain(call, &analyzer.wrapper.name, source);
    if !chain.iter().any(|m| *m == analyzer.constructor) {
        return Classification::NotApplicable;
    }
    if chain.iter().any(|m| *m == analyzer.wrapper.name) {
        Classification::Compliant
    } else {
        Classification::Violating { receiver }
    }
}

/// Receiver of `receiver.<execute>(...)`.
fn execute_receiver<'t>(call: Node<'t>, execute: &str, source: &[u8]) -> Option<Node<'t>> {
    let function = call.child_by_field_name("function")?;
    if function.kind() != "selector_expression" {
        return None;
    }
    let field = function.child_by_field_name("field")?;
    if node_text(field, source) != execute {
        return None;
    }
    function.child_by_field_name("operand")
}

fn is_wrapper_call(receiver: Node, analyzer: &Analyzer, info: &TypeInfo) -> bool {
    let receiver = strip_parens(receiver);
    receiver.kind() == "call_expression"
        && matches!(
            info.callee_of(receiver),
            Some(FullName::Func(name)) if *name == analyzer.wrapper
        )
}

fn strip_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Method names from the start of the chain up to `call`.
///
/// `db.NewUpdate().Model(u).Exec(ctx)` gives `[NewUpdate, Model, Exec]`. A call
/// to `wrapper` is recorded and then followed through its first argument, so
/// `WithOptimistic(db.NewUpdate()).Exec(ctx)` gives `[NewUpdate, WithOptimistic, Exec]`.
pub fn method_chain(call: Node, wrapper: &str, source: &[u8]) -> MethodChain {
    let mut chain = MethodChain::new();
    let mut current = Some(call);

    while let Some(node) = current.take() {
        match node.kind() {
            "call_expression" => {
                let Some(function) = node.child_by_field_name("function") else {
                    break;
                };
                let (name, next) = match function.kind() {
                    "selector_expression" => (
                        function.child_by_field_name("field"),
                        function.child_by_field_name("operand"),
                    ),
                    "identifier" => (Some(function), None),
                    _ => (None, None),
                };
                let Some(name) = name.map(|n| node_text(n, source)) else {
                    break;
                };
                chain.push(name.to_string());
                current = if name == wrapper {
                    node.child_by_field_name("arguments")
                        .and_then(|args| args.named_child(0))
                } else {
                    next
                };
            }
            "parenthesized_expression" => current = node.named_child(0),
            "selector_expression" => current = node.child_by_field_name("operand"),
            _ => {}
        }
    }

    chain.reverse();
    chain
}
