use serde::Serialize;

/// Replace bytes `start..end` of a file with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

/// A rewrite that resolves a diagnostic. Its edits are applied together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedFix {
    pub message: String,
    pub edits: Vec<TextEdit>,
}

/// One violating call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Byte offset into the file.
    pub position: usize,
    pub message: String,
    pub suggested_fixes: Vec<SuggestedFix>,
}
