use super::{output_json, print_summary, BranchMetricsAggregator};
use crate::branches::enumerate_branches;
use crate::cli::CommonArgs;
use crate::model::FileKey;
use crate::scan::scan_branch_metrics;
use crate::util::{print_saved, print_skipped, spinner};
use anyhow::Context;
use std::path::PathBuf;

pub fn exec(common: CommonArgs, json: bool, output: Option<PathBuf>, file_key: FileKey) -> anyhow::Result<()> {
    let mut repo = common.open_repo().context("Failed to open git repository")?;
    let branches = enumerate_branches(&repo, common.branches).context("Failed to enumerate branches")?;

    let aggregator = BranchMetricsAggregator::new(file_key);
    let pb = spinner(!common.quiet);
    let report = scan_branch_metrics(&mut repo, &branches, &aggregator, common.on_error, &pb);
    pb.finish_and_clear();
    let report = report.context("Failed to analyze branches")?;

    if json && output.is_none() {
        output_json(&report.result, None)?;
    } else {
        print_summary(&report.result);
    }
    if let Some(path) = &output {
        output_json(&report.result, Some(path.as_path())).context("Failed to write JSON report")?;
        print_saved("Branch metrics (JSON)", path);
    }

    print_skipped(&report.skipped);
    Ok(())
}
