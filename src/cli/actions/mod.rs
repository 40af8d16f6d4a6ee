//! Actions for processing analysis issues.
//!
//! Actions convert Issues into Operations and execute them.
//!
//! ```text
//! Issue (problem detected)
//!     ↓
//! Action (Issue → Operation conversion)
//!     ↓
//! Operation (span replacement in a source file)
//!     ↓
//! execute (file modification)
//! ```
//!
//! - [`ApplyFix`]: Wrap unguarded update receivers (fix)

mod apply_fix;
mod operation;
mod traits;

pub use apply_fix::ApplyFix;
pub use traits::{Action, ActionStats};
