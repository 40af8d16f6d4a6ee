//! Diagnostic and fix synthesis for a violating call.
//!
//! The fix is plain text templating: the receiver's source text is enclosed in
//! a wrapper call, so `db.NewUpdate().Model(u).Exec(ctx)` becomes
//! `bunwithoptimistic.WithOptimistic(db.NewUpdate().Model(u)).Exec(ctx)`.

use anyhow::{Result, bail};
use tree_sitter::Node;

use super::{Analyzer, Diagnostic, Strategy, SuggestedFix, TextEdit};
use crate::core::collect::{FileImports, ImportName};
use crate::utils::go_package_name;

/// Build the diagnostic for `call`, whose receiver `receiver` was classified as violating.
///
/// The chain strategy anchors at the call and carries no fix. The types strategy
/// anchors at the `Exec` selector and suggests wrapping the receiver.
pub fn synthesize(
    call: Node,
    receiver: Node,
    analyzer: &Analyzer,
    imports: &FileImports,
    source: &str,
) -> Result<Diagnostic> {
    let message = analyzer.message();

    match analyzer.strategy {
        Strategy::Chain => Ok(Diagnostic {
            position: call.start_byte(),
            message,
            suggested_fixes: Vec::new(),
        }),
        Strategy::Types => {
            let position = call
                .child_by_field_name("function")
                .and_then(|f| f.child_by_field_name("field"))
                .map_or(call.start_byte(), |field| field.start_byte());
            let fix = wrap_receiver(receiver, analyzer, imports, source)?;
            Ok(Diagnostic {
                position,
                message,
                suggested_fixes: vec![fix],
            })
        }
    }
}

/// Replace the receiver span with `<qualifier>WithOptimistic(<receiver>)`.
///
/// The qualifier is whatever name the file already uses for the wrapper's
/// package: its alias, nothing for a dot import, or the default package name.
pub fn wrap_receiver(
    receiver: Node,
    analyzer: &Analyzer,
    imports: &FileImports,
    source: &str,
) -> Result<SuggestedFix> {
    let (start, end) = (receiver.start_byte(), receiver.end_byte());
    let Some(text) = source.get(start..end) else {
        bail!(
            "Receiver span {}..{} does not lie on character boundaries of the source ({} bytes)",
            start,
            end,
            source.len()
        );
    };

    let qualifier = match imports.local_name_of(&analyzer.wrapper.package) {
        Some(ImportName::Dot) => String::new(),
        Some(ImportName::Named(name)) => format!("{}.", name),
        None => format!("{}.", go_package_name(&analyzer.wrapper.package)),
    };

    Ok(SuggestedFix {
        message: format!("Wrap with {}", analyzer.wrapper.short_name()),
        edits: vec![TextEdit {
            start,
            end,
            new_text: format!("{}{}({})", qualifier, analyzer.wrapper.name, text),
        }],
    })
}
