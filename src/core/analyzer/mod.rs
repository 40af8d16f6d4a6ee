//! Phase 3: Analysis
//!
//! Finds `Exec` calls on bun update builders that were not routed through the
//! optimistic-lock wrapper, and proposes the rewrite that routes them.
//!
//! ## Module Structure
//!
//! - `classify`: Decides whether a single call expression is a violation
//! - `synthesize`: Builds the diagnostic and suggested fix for a violation
//! - `pass`: Drives the classifier over every call of a file
//! - `diagnostic`: Output types (`Diagnostic`, `SuggestedFix`, `TextEdit`)

pub mod classify;
pub mod diagnostic;
pub mod pass;
pub mod synthesize;


use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub use classify::{Classification, MethodChain};
pub use diagnostic::{Diagnostic, SuggestedFix, TextEdit};
pub use pass::{FileInput, run};

use crate::config::Config;
use crate::core::types::QualifiedName;
use crate::core::types::stubs::{BUN_PACKAGE, WRAPPER_PACKAGE};

/// How call sites are classified.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Resolve the receiver's static type.
    #[default]
    Types,
    /// Match method names along the call chain.
    Chain,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Types => write!(f, "types"),
            Strategy::Chain => write!(f, "chain"),
        }
    }
}

/// Immutable description of the analysis, built once per run.
#[derive(Debug, Clone)]
pub struct Analyzer {
    pub strategy: Strategy,
    /// Type whose `Exec` must be guarded (`github.com/uptrace/bun.UpdateQuery`).
    pub builder_type: QualifiedName,
    /// Method that starts an update chain (`NewUpdate`).
    pub constructor: String,
    /// Method that runs the query (`Exec`).
    pub execute: String,
    /// Function that installs the guard (`...bunwithoptimistic.WithOptimistic`).
    pub wrapper: QualifiedName,
}

impl Analyzer {
    pub const NAME: &'static str = "optguard";
    pub const DOC: &'static str =
        "check that bun update queries are executed through the optimistic-lock wrapper";

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            strategy: config.strategy,
            builder_type: config.builder_type()?,
            constructor: config.builder_constructor.clone(),
            execute: config.execute_method.clone(),
            wrapper: config.wrapper()?,
        })
    }

    /// `bun.UpdateQuery must wrap with bunwithoptimistic.WithOptimistic`
    pub fn message(&self) -> String {
        format!(
            "{} must wrap with {}",
            self.builder_type.short_name(),
            self.wrapper.short_name()
        )
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            builder_type: QualifiedName::new(BUN_PACKAGE, "UpdateQuery"),
            constructor: "NewUpdate".to_string(),
            execute: "Exec".to_string(),
            wrapper: QualifiedName::new(WRAPPER_PACKAGE, "WithOptimistic"),
        }
    }
}
