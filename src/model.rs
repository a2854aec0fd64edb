use clap::ValueEnum;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 2;

/// year -> month (1-12) -> commit count
pub type YearMonthCount = BTreeMap<i32, BTreeMap<u32, u64>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchedFile {
    pub path: Option<String>,
}

impl TouchedFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// Repository-relative path, if the backend reported a non-empty one.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Final path component.
    pub fn name(&self) -> Option<&str> {
        self.path()
            .and_then(|p| p.rsplit('/').next())
            .filter(|n| !n.is_empty())
    }
}

/// One commit as seen from a branch traversal. Year and month are already
/// resolved under the source's time policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: String,
    pub year: i32,
    pub month: u32,
    pub author: String,
    pub insertions: u64,
    pub deletions: u64,
    pub files: Vec<TouchedFile>,
}

/// Change detail for a single commit, as stored in the delta cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDelta {
    pub insertions: u64,
    pub deletions: u64,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BranchMetrics {
    pub total_commits: u64,
    pub authors: IndexMap<String, u64>,
    pub file_changes: IndexMap<String, u64>,
    pub lines_added: u64,
    pub lines_removed: u64,
}

impl BranchMetrics {
    /// Top `n` authors by commit count; ties keep first-encountered order.
    pub fn top_authors(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.authors, n)
    }

    /// Top `n` files by change count; ties keep first-encountered order.
    pub fn top_files(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.file_changes, n)
    }
}

fn top_n(counts: &IndexMap<String, u64>, n: usize) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    // stable sort keeps insertion order among equal counts
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);
    entries
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBranch {
    pub branch: String,
    pub reason: String,
}

/// Result of a pipeline run plus the branches that did not contribute to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport<T> {
    pub result: T,
    pub skipped: Vec<SkippedBranch>,
}

impl<T> ScanReport<T> {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    /// id, timestamp and author only
    #[default]
    Summary,
    /// also insertions, deletions and touched files
    Changes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BranchScope {
    #[default]
    All,
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ErrorPolicy {
    /// Abort the run on the first branch that fails to traverse
    #[default]
    Fail,
    /// Report the branch, leave it out of the result, and continue
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimePolicy {
    #[default]
    Utc,
    /// Use the UTC offset recorded in the commit
    Committer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FileKey {
    /// Repository-relative path
    #[default]
    Path,
    /// Final path component only
    Name,
}

impl FileKey {
    pub fn key<'a>(&self, file: &'a TouchedFile) -> Option<&'a str> {
        match self {
            FileKey::Path => file.path(),
            FileKey::Name => file.name(),
        }
    }
}
