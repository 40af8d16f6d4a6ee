use anyhow::Result;
use insta_cmd::assert_cmd_snapshot;
use pretty_assertions::assert_eq;

use crate::{CliTest, REPO_GO};

#[test]
fn test_fix_dry_run_leaves_files_untouched() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.fix_command());
    assert_eq!(test.read_file("repo/repo.go")?, REPO_GO);

    Ok(())
}

#[test]
fn test_fix_apply_rewrites_and_is_idempotent() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.fix_command().arg("--apply"));

    let fixed = test.read_file("repo/repo.go")?;
    assert_eq!(
        fixed,
        REPO_GO.replace(
            "\t_, err := db.NewUpdate().Model(u).WherePK().Exec(ctx)",
            "\t_, err := bunwithoptimistic.WithOptimistic(db.NewUpdate().Model(u).WherePK()).Exec(ctx)",
        )
    );

    assert_cmd_snapshot!(test.check_command());

    assert_cmd_snapshot!(test.fix_command().arg("--apply"));
    assert_eq!(test.read_file("repo/repo.go")?, fixed);

    Ok(())
}

#[test]
fn test_fix_uses_import_alias() -> Result<()> {
    let test = CliTest::with_file(
        "repo/repo.go",
        r#"package repo

import (
	"context"

	guard "github.com/takaaa220/bunwithoptimistic"
	"github.com/uptrace/bun"
)

func Update(ctx context.Context, db *bun.DB, u any) error {
	_, err := db.NewUpdate().Model(u).Exec(ctx)
	return err
}
"#,
    )?;

    assert_cmd_snapshot!(test.fix_command());
    assert_cmd_snapshot!(test.fix_command().arg("--apply"));
    assert!(
        test.read_file("repo/repo.go")?
            .contains("_, err := guard.WithOptimistic(db.NewUpdate().Model(u)).Exec(ctx)")
    );

    Ok(())
}

#[test]
fn test_fix_chain_strategy_has_no_fix() -> Result<()> {
    let test = CliTest::with_file("repo/repo.go", REPO_GO)?;

    assert_cmd_snapshot!(test.fix_command().args(["--strategy", "chain", "--apply"]));
    assert_eq!(test.read_file("repo/repo.go")?, REPO_GO);

    Ok(())
}

#[test]
fn test_fix_nothing_to_do() -> Result<()> {
    let test = CliTest::with_file("repo/model.go", "package repo\n\ntype User struct{}\n")?;

    assert_cmd_snapshot!(test.fix_command());

    Ok(())
}
