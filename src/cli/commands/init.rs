//! Init command - Write a default `.optguard.json` to the current directory.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::exit_status::ExitStatus;
use super::super::report::SUCCESS_MARK;
use crate::config::{CONFIG_FILE_NAME, default_config_json};

pub fn init() -> Result<ExitStatus> {
    init_in(Path::new("."))
}

/// Create the config file in `dir`. An existing file is never overwritten.
fn init_in(dir: &Path) -> Result<ExitStatus> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
        return Ok(ExitStatus::Failure);
    }

    fs::write(&config_path, default_config_json()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );

    Ok(ExitStatus::Success)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::config::load_config;
    use crate::core::analyzer::Strategy;

    #[test]
    fn test_init_writes_loadable_default_config() {
        let dir = tempdir().unwrap();

        assert_eq!(init_in(dir.path()).unwrap(), ExitStatus::Success);

        let content = fs::read_to_string(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(json["strategy"], "types");
        assert_eq!(json["builderType"], "github.com/uptrace/bun.UpdateQuery");
        assert_eq!(json["builderConstructor"], "NewUpdate");
        assert_eq!(json["executeMethod"], "Exec");
        assert_eq!(
            json["wrapper"],
            "github.com/takaaa220/bunwithoptimistic.WithOptimistic"
        );
        assert_eq!(
            json["ignores"],
            serde_json::json!(["**/vendor/**", "**/testdata/**"])
        );
        assert_eq!(json["ignoreTestFiles"], true);

        let loaded = load_config(dir.path()).unwrap();
        assert!(loaded.from_file);
        assert_eq!(loaded.config.strategy, Strategy::Types);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "strategy": "chain" }"#).unwrap();

        assert_eq!(init_in(dir.path()).unwrap(), ExitStatus::Failure);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{ "strategy": "chain" }"#
        );
    }
}
