//! Core analysis pipeline.
//!
//! - `file_scanner`: Finds the Go files to analyze
//! - `parsers`: tree-sitter parsing of Go sources
//! - `collect`: Imports and package-level declarations
//! - `types`: Static type resolution of expressions
//! - `analyzer`: Classification of call sites and fix synthesis
//! - `context`: Lazily evaluated pipeline shared by the commands

pub mod analyzer;
pub mod collect;
pub mod context;
pub mod data;
pub mod file_scanner;
pub mod parsers;
pub mod types;

pub use context::{AllDiagnostics, CheckContext};
pub use data::{SourceContext, SourceLocation};
