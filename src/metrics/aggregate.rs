use crate::model::{BranchMetrics, CommitRecord, FileKey};

/// Running totals for one branch. Only [`BranchMetricsAggregator`] mutates
/// it, and [`BranchMetricsAggregator::finalize`] consumes it.
#[derive(Debug)]
pub struct BranchContext {
    branch: String,
    metrics: BranchMetrics,
}

impl BranchContext {
    pub fn metrics(&self) -> &BranchMetrics {
        &self.metrics
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BranchMetricsAggregator {
    file_key: FileKey,
}

impl BranchMetricsAggregator {
    pub fn new(file_key: FileKey) -> Self {
        Self { file_key }
    }

    pub fn new_branch_context(&self, branch: &str) -> BranchContext {
        BranchContext {
            branch: branch.to_string(),
            metrics: BranchMetrics::default(),
        }
    }

    /// Adds one commit. Input is taken verbatim; the source owns validation.
    pub fn observe(&self, ctx: &mut BranchContext, commit: &CommitRecord) {
        let m = &mut ctx.metrics;
        m.total_commits += 1;
        *m.authors.entry(commit.author.clone()).or_insert(0) += 1;
        m.lines_added += commit.insertions;
        m.lines_removed += commit.deletions;

        for file in &commit.files {
            if let Some(key) = self.file_key.key(file) {
                *m.file_changes.entry(key.to_string()).or_insert(0) += 1;
            }
        }
    }

    pub fn finalize(&self, ctx: BranchContext) -> (String, BranchMetrics) {
        (ctx.branch, ctx.metrics)
    }
}
