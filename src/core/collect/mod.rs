//! Phase 1: Collection
//!
//! Collects the declarations the type pass needs before any function body is
//! examined:
//!
//! - `imports`: per-file import table (local name → import path)
//! - `declarations`: per-package functions, methods, struct fields and variables

pub mod declarations;
pub mod imports;

pub use declarations::{FieldDecl, PackageDecls};
pub use imports::{FileImports, ImportName};
