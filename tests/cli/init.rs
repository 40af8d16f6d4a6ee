use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, REPO_GO};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.init_command());
    assert!(test.root().join(".optguard.json").exists());

    insta::assert_snapshot!(test.read_file(".optguard.json")?, @r#"
    {
      "ignores": [
        "**/vendor/**",
        "**/testdata/**"
      ],
      "includes": [],
      "ignoreTestFiles": true,
      "strategy": "types",
      "builderType": "github.com/uptrace/bun.UpdateQuery",
      "builderConstructor": "NewUpdate",
      "executeMethod": "Exec",
      "wrapper": "github.com/takaaa220/bunwithoptimistic.WithOptimistic",
      "signatures": {}
    }
    "#);

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".optguard.json", "{}")?;

    assert_cmd_snapshot!(test.init_command());
    assert_eq!(test.read_file(".optguard.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.init_command());

    test.write_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}
