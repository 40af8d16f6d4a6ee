//! Rule implementations for optguard.
//!
//! Each rule is a pure function over the analysis results it needs, plus a
//! thin wrapper that pulls those results out of a `CheckContext`.
//!
//! - `unguarded_update`: Updates executed without the optimistic-lock wrapper

pub mod unguarded_update;

pub use unguarded_update::{check_unguarded_update, check_unguarded_update_issues};
