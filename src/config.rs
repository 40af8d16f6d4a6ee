use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::analyzer::Strategy;
use crate::core::types::{FullName, GoType, QualifiedName};
use crate::utils::is_go_identifier;

pub const CONFIG_FILE_NAME: &str = ".optguard.json";

pub const TEST_FILE_PATTERNS: &[&str] = &["**/*_test.go"];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_ignore_test_files")]
    pub ignore_test_files: bool,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_builder_type")]
    pub builder_type: String,
    #[serde(default = "default_builder_constructor")]
    pub builder_constructor: String,
    #[serde(default = "default_execute_method")]
    pub execute_method: String,
    #[serde(default = "default_wrapper")]
    pub wrapper: String,
    /// Extra result types for external functions and methods, keyed by Go full name,
    /// e.g. `"(*example.com/store.Repo).Update": ["*github.com/uptrace/bun.UpdateQuery"]`.
    #[serde(default)]
    pub signatures: BTreeMap<String, Vec<String>>,
}

fn default_ignores() -> Vec<String> {
    ["**/vendor/**", "**/testdata/**"].map(String::from).to_vec()
}

fn default_ignore_test_files() -> bool {
    true
}

fn default_builder_type() -> String {
    "github.com/uptrace/bun.UpdateQuery".to_string()
}

fn default_builder_constructor() -> String {
    "NewUpdate".to_string()
}

fn default_execute_method() -> String {
    "Exec".to_string()
}

fn default_wrapper() -> String {
    "github.com/takaaa220/bunwithoptimistic.WithOptimistic".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: default_ignores(),
            includes: Vec::new(),
            ignore_test_files: default_ignore_test_files(),
            strategy: Strategy::default(),
            builder_type: default_builder_type(),
            builder_constructor: default_builder_constructor(),
            execute_method: default_execute_method(),
            wrapper: default_wrapper(),
            signatures: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns, malformed qualified names and
    /// signature entries that do not parse as Go full names and types.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        self.builder_type()?;
        self.wrapper()?;

        for (field, value) in [
            ("builderConstructor", &self.builder_constructor),
            ("executeMethod", &self.execute_method),
        ] {
            if !is_go_identifier(value) {
                bail!("Invalid method name in '{}': \"{}\"", field, value);
            }
        }

        for (key, results) in &self.signatures {
            if FullName::parse(key).is_none() {
                bail!(
                    "Invalid key in 'signatures': \"{}\" (expected \"pkg/path.Func\" or \"(*pkg/path.Type).Method\")",
                    key
                );
            }
            for result in results {
                if GoType::parse(result).is_none() {
                    bail!("Invalid result type for \"{}\" in 'signatures': \"{}\"", key, result);
                }
            }
        }

        Ok(())
    }

    /// The builder type whose pointer receivers must not call the execute method directly.
    pub fn builder_type(&self) -> Result<QualifiedName> {
        QualifiedName::parse(&self.builder_type).with_context(|| {
            format!(
                "Invalid type in 'builderType': \"{}\" (expected \"pkg/path.Type\")",
                self.builder_type
            )
        })
    }

    /// The guard function every update query must pass through.
    pub fn wrapper(&self) -> Result<QualifiedName> {
        QualifiedName::parse(&self.wrapper).with_context(|| {
            format!(
                "Invalid function in 'wrapper': \"{}\" (expected \"pkg/path.Func\")",
                self.wrapper
            )
        })
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.strategy, Strategy::Types);
        assert_eq!(config.builder_constructor, "NewUpdate");
        assert_eq!(config.execute_method, "Exec");
        assert!(config.includes.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_identities() {
        let config = Config::default();
        let builder = config.builder_type().unwrap();
        assert_eq!(builder.package, "github.com/uptrace/bun");
        assert_eq!(builder.name, "UpdateQuery");

        let wrapper = config.wrapper().unwrap();
        assert_eq!(wrapper.package, "github.com/takaaa220/bunwithoptimistic");
        assert_eq!(wrapper.name, "WithOptimistic");
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignores": ["**/gen/**"],
              "includes": ["internal"],
              "strategy": "chain",
              "wrapper": "example.com/lock.Guard"
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignores, vec!["**/gen/**"]);
        assert_eq!(config.includes, vec!["internal"]);
        assert_eq!(config.strategy, Strategy::Chain);
        assert_eq!(config.wrapper().unwrap().name, "Guard");
    }

    #[test]
    fn test_partial_config() {
        let json = r#"{ "ignoreTestFiles": false }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert!(!config.ignore_test_files);
        assert_eq!(config.ignores, default_ignores());
        assert_eq!(config.builder_type, default_builder_type());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("internal").join("store");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "strategy": "chain" }"#,
        )
        .unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.strategy, Strategy::Chain);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.strategy, Strategy::Types);
    }

    #[test]
    fn test_load_config_with_invalid_strategy_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "strategy": "magic" }"#,
        )
        .unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_invalid_ignore_pattern() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ignores"));
    }

    #[test]
    fn test_validate_invalid_builder_type() {
        let config = Config {
            builder_type: "UpdateQuery".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("builderType"));
    }

    #[test]
    fn test_validate_invalid_method_name() {
        let config = Config {
            execute_method: "Exec()".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("executeMethod"));
    }

    #[test]
    fn test_validate_signatures() {
        let mut config = Config::default();
        config.signatures.insert(
            "(*example.com/store.Repo).Update".to_string(),
            vec!["*github.com/uptrace/bun.UpdateQuery".to_string()],
        );
        assert!(config.validate().is_ok());

        config
            .signatures
            .insert("not a name".to_string(), Vec::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("signatures"));
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let json = default_config_json().unwrap();
        assert!(json.contains("builderConstructor"));
        assert!(json.contains("ignoreTestFiles"));
        assert!(json.contains("\"strategy\": \"types\""));
    }
}
