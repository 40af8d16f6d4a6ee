use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;

use crate::{CliTest, REPO_GO};

#[test]
fn test_check_reports_unguarded_update() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_clean_project() -> Result<()> {
    let test = CliTest::with_file(
        "repo/repo.go",
        r#"package repo

import (
	"context"

	"github.com/takaaa220/bunwithoptimistic"
	"github.com/uptrace/bun"
)

func Update(ctx context.Context, db *bun.DB, u any) error {
	_, err := bunwithoptimistic.WithOptimistic(db.NewUpdate().Model(u)).Exec(ctx)
	return err
}
"#,
    )?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_reports_issues_across_packages() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("users/repo.go", REPO_GO)?;
    test.write_file("orders/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_chain_strategy_is_warning() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command().args(["--strategy", "chain"]));

    Ok(())
}

#[test]
fn test_check_strategy_from_config() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;
    test.write_file(".optguard.json", r#"{ "strategy": "chain" }"#)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_json_format() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command().args(["--format", "json"]));

    Ok(())
}

#[test]
fn test_check_parse_error_exits_with_error() -> Result<()> {
    let test = CliTest::with_file("repo/broken.go", "package repo\n\nfunc f( {\n")?;

    insta::with_settings!({filters => vec![
        (r"Syntax error at \d+:\d+", "Syntax error at [POSITION]"),
    ]}, {
        assert_cmd_snapshot!(test.check_command());
    });

    Ok(())
}

#[test]
fn test_check_ignores_test_files_and_vendor() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("repo/repo_test.go", REPO_GO)?;
    test.write_file("vendor/github.com/x/y/y.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_check_source_root() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("services/a/repo.go", REPO_GO)?;
    test.write_file("services/b/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.check_command().args(["--source-root", "services/a"]));

    Ok(())
}

#[test]
fn test_check_invalid_config() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;
    test.write_file(".optguard.json", r#"{ "wrapper": "WithOptimistic" }"#)?;

    assert_cmd_snapshot!(test.check_command());

    Ok(())
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("--help"));

    Ok(())
}
