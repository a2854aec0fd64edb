use super::{output_json, output_text, print_statistics};
use crate::branches::enumerate_branches;
use crate::cli::CommonArgs;
use crate::scan::scan_time_buckets;
use crate::util::{print_saved, print_skipped, spinner};
use anyhow::Context;
use std::path::PathBuf;

pub fn exec(common: CommonArgs, json: bool, output: Option<PathBuf>, text: Option<PathBuf>) -> anyhow::Result<()> {
    let mut repo = common.open_repo().context("Failed to open git repository")?;
    let branches = enumerate_branches(&repo, common.branches).context("Failed to enumerate branches")?;

    let pb = spinner(!common.quiet);
    let report = scan_time_buckets(&mut repo, &branches, common.on_error, &pb);
    pb.finish_and_clear();
    let report = report.context("Failed to count commits")?;

    let buckets = report.result.snapshot();

    if json && output.is_none() {
        output_json(&buckets, None)?;
    } else {
        print_statistics(&buckets);
    }
    if let Some(path) = &output {
        output_json(&buckets, Some(path.as_path())).context("Failed to write JSON report")?;
        print_saved("Commit statistics (JSON)", path);
    }
    if let Some(path) = &text {
        output_text(&buckets, path).context("Failed to write text report")?;
        print_saved("Commit statistics (text)", path);
    }

    print_skipped(&report.skipped);
    Ok(())
}
