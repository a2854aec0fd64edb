//! Sequential per-branch traversal for both pipelines.
//!
//! Branches are walked one after the other; a branch's stream is drained
//! completely before the next `commits_of` call. Whatever a failing branch
//! contributed is discarded, so under [`ErrorPolicy::Skip`] a result never
//! contains half a branch.

use crate::error::{GtallyError, Result};
use crate::metrics::BranchMetricsAggregator;
use crate::model::{BranchMetrics, CommitRecord, Detail, ErrorPolicy, ScanReport, SkippedBranch};
use crate::source::CommitSource;
use crate::timeline::TimeBucketAggregator;
use indicatif::ProgressBar;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub fn scan_time_buckets<S: CommitSource + ?Sized>(
    source: &mut S,
    branches: &[String],
    policy: ErrorPolicy,
    pb: &ProgressBar,
) -> Result<ScanReport<TimeBucketAggregator>> {
    let mut total = TimeBucketAggregator::new();
    let mut skipped = Vec::new();

    for branch in branches {
        info!(%branch, "processing branch");
        pb.set_message(format!("Counting commits on {branch}"));

        let mut staged = TimeBucketAggregator::new();
        match drain(source, branch, Detail::Summary, pb, |c| staged.observe(c)) {
            Ok(count) => {
                debug!(%branch, count, "branch counted");
                total.absorb(staged);
            }
            Err(err) => record_failure(err, branch, policy, &mut skipped)?,
        }
    }

    Ok(ScanReport { result: total, skipped })
}

pub fn scan_branch_metrics<S: CommitSource + ?Sized>(
    source: &mut S,
    branches: &[String],
    aggregator: &BranchMetricsAggregator,
    policy: ErrorPolicy,
    pb: &ProgressBar,
) -> Result<ScanReport<BTreeMap<String, BranchMetrics>>> {
    let mut per_branch = BTreeMap::new();
    let mut skipped = Vec::new();

    for branch in branches {
        info!(%branch, "analyzing branch");
        pb.set_message(format!("Analyzing {branch}"));

        let mut ctx = aggregator.new_branch_context(branch);
        match drain(source, branch, Detail::Changes, pb, |c| aggregator.observe(&mut ctx, c)) {
            Ok(count) => {
                let (name, metrics) = aggregator.finalize(ctx);
                debug!(branch = %name, count, authors = metrics.authors.len(), "branch analyzed");
                per_branch.insert(name, metrics);
            }
            Err(err) => record_failure(err, branch, policy, &mut skipped)?,
        }
    }

    Ok(ScanReport { result: per_branch, skipped })
}

fn drain<S, F>(source: &mut S, branch: &str, detail: Detail, pb: &ProgressBar, mut observe: F) -> Result<u64>
where
    S: CommitSource + ?Sized,
    F: FnMut(&CommitRecord),
{
    let mut count = 0u64;
    for commit in source.commits_of(branch, detail)? {
        observe(&commit?);
        count += 1;
        pb.inc(1);
    }
    Ok(count)
}

fn record_failure(
    err: GtallyError,
    branch: &str,
    policy: ErrorPolicy,
    skipped: &mut Vec<SkippedBranch>,
) -> Result<()> {
    if err.is_structural() {
        return Err(err);
    }
    let err = match err {
        e @ GtallyError::Traversal { .. } => e,
        other => GtallyError::traversal(branch, other),
    };

    match policy {
        ErrorPolicy::Fail => Err(err),
        ErrorPolicy::Skip => {
            warn!(%branch, error = %err, "skipping branch");
            skipped.push(SkippedBranch {
                branch: branch.to_string(),
                reason: err.to_string(),
            });
            Ok(())
        }
    }
}
