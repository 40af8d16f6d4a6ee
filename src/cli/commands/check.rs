use anyhow::Result;

use super::super::{
    args::{CheckCommand, OutputFormat},
    exit_status::ExitStatus,
    report,
};
use super::helper::{collect_issues, finish};
use crate::core::CheckContext;

pub fn check(cmd: CheckCommand, verbose: bool) -> Result<ExitStatus> {
    let args = &cmd.args;
    let ctx = CheckContext::new(&args.common)?;

    let result = finish(collect_issues(&ctx)?, ctx.files.len());

    match args.format {
        OutputFormat::Json => report::report_json(&result.issues)?,
        OutputFormat::Text => {
            if result.issues.is_empty() {
                report::print_success(result.source_files_checked);
            } else {
                report::report(&result.issues);
            }
            report::print_parse_warning(result.parse_error_count, verbose);
        }
    }

    Ok(result.exit_status())
}
