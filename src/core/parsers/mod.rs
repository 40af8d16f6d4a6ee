//! File parsers for analyzed source code.
//!
//! - `go`: Go source file parser (uses tree-sitter for AST generation)

pub mod go;
