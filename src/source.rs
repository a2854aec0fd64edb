//! Read-only access to branches and their commit streams.
//!
//! [`CommitSource`] is the only seam between aggregation and the
//! version-control backend. A source hands out one commit stream at a time:
//! the stream borrows the source mutably, so a second traversal cannot start
//! until the first one is dropped.

use crate::error::{GtallyError, Result};
use crate::model::{CommitRecord, Detail};

pub type CommitStream<'a> = Box<dyn Iterator<Item = Result<CommitRecord>> + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short name, e.g. `main` or `origin/main`
    pub name: String,
    pub remote: bool,
}

impl BranchRef {
    pub fn local(name: impl Into<String>) -> Self {
        Self { name: name.into(), remote: false }
    }

    pub fn remote(name: impl Into<String>) -> Self {
        Self { name: name.into(), remote: true }
    }
}

pub trait CommitSource {
    /// Every branch reference the backend knows about, local and
    /// remote-tracking, in backend order. May contain duplicates.
    fn list_branches(&self) -> Result<Vec<BranchRef>>;

    /// Commits reachable from `branch`. Each commit of the branch is yielded
    /// once; order carries no meaning for aggregation.
    fn commits_of(&mut self, branch: &str, detail: Detail) -> Result<CommitStream<'_>>;
}

/// A fixed set of branches held in memory.
///
/// Used to drive the aggregators without a repository on disk. A branch can
/// be told to fail after yielding a number of commits to exercise the
/// failure policies.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    branches: Vec<MemoryBranch>,
}

#[derive(Debug, Clone)]
struct MemoryBranch {
    reference: BranchRef,
    commits: Vec<CommitRecord>,
    fail_after: Option<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_branch(mut self, reference: BranchRef, commits: Vec<CommitRecord>) -> Self {
        self.branches.push(MemoryBranch { reference, commits, fail_after: None });
        self
    }

    /// Make `branch` yield `count` commits and then an error.
    pub fn failing_after(mut self, branch: &str, count: usize) -> Self {
        for b in self.branches.iter_mut().filter(|b| b.reference.name == branch) {
            b.fail_after = Some(count);
        }
        self
    }
}

impl CommitSource for MemorySource {
    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self.branches.iter().map(|b| b.reference.clone()).collect())
    }

    fn commits_of(&mut self, branch: &str, detail: Detail) -> Result<CommitStream<'_>> {
        let found = self
            .branches
            .iter()
            .find(|b| b.reference.name == branch)
            .ok_or_else(|| GtallyError::traversal(branch, "no such branch"))?;

        let name = branch.to_string();
        let fail_after = found.fail_after;
        let stream = found
            .commits
            .iter()
            .cloned()
            .map(move |mut c| {
                if detail == Detail::Summary {
                    c.insertions = 0;
                    c.deletions = 0;
                    c.files.clear();
                }
                Ok(c)
            })
            .take(fail_after.unwrap_or(usize::MAX))
            .chain(
                fail_after
                    .map(|_| Err(GtallyError::traversal(&name, "corrupt history segment")))
                    .into_iter(),
            );
        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TouchedFile;

    fn commit(id: &str) -> CommitRecord {
        CommitRecord {
            id: id.into(),
            year: 2024,
            month: 5,
            author: "Alice".into(),
            insertions: 4,
            deletions: 1,
            files: vec![TouchedFile::new("a.rs")],
        }
    }

    #[test]
    fn summary_detail_strips_changes() {
        let mut src = MemorySource::new().with_branch(BranchRef::local("main"), vec![commit("c1")]);
        let got: Vec<_> = src.commits_of("main", Detail::Summary).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(got[0].insertions, 0);
        assert!(got[0].files.is_empty());
    }

    #[test]
    fn failing_branch_errors_after_count() {
        let mut src = MemorySource::new()
            .with_branch(BranchRef::local("main"), vec![commit("c1"), commit("c2"), commit("c3")])
            .failing_after("main", 1);
        let items: Vec<_> = src.commits_of("main", Detail::Changes).unwrap().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(GtallyError::Traversal { .. })));
    }

    #[test]
    fn unknown_branch_is_traversal_error() {
        let mut src = MemorySource::new();
        assert!(matches!(
            src.commits_of("nope", Detail::Summary),
            Err(GtallyError::Traversal { .. })
        ));
    }
}
