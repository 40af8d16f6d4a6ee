//! Core data types shared by analysis, rules and reporting.

pub mod source;

pub use source::{SourceContext, SourceLocation};
