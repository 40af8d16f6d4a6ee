//! optguard - optimistic-lock checker for bun update queries in Go
//!
//! optguard is a CLI tool and library that finds bun `NewUpdate()...Exec(ctx)`
//! calls which were not routed through `bunwithoptimistic.WithOptimistic`,
//! and rewrites them to be.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and actions)
//! - `config`: Configuration file loading and parsing
//! - `core`: Core analysis engine (collection, type resolution, analysis)
//! - `issues`: Issue type definitions and reporting
//! - `rules`: Detection rules
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
pub mod utils;
