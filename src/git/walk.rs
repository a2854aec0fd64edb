use super::delta::commit_delta;
use crate::cache::DeltaCache;
use crate::error::{GtallyError, Result};
use crate::model::{CommitDelta, CommitRecord, Detail, TimePolicy, TouchedFile};
use crate::util::year_month;
use gix::{ObjectId, Repository};
use std::collections::{BinaryHeap, HashSet};

/// Lazy newest-first walk over every commit reachable from one branch tip.
///
/// The queue is ordered by committer time, ties broken by object id, and a
/// commit enters it at most once, so shared ancestry inside the branch is
/// yielded once. The walk stops for good after the first error.
pub struct BranchCommits<'a> {
    repo: &'a Repository,
    cache: &'a DeltaCache,
    branch: String,
    detail: Detail,
    time_policy: TimePolicy,
    queue: BinaryHeap<(i64, ObjectId)>,
    seen: HashSet<ObjectId>,
    done: bool,
}

impl<'a> BranchCommits<'a> {
    pub(crate) fn new(
        repo: &'a Repository,
        cache: &'a DeltaCache,
        branch: &str,
        tip: ObjectId,
        detail: Detail,
        time_policy: TimePolicy,
    ) -> Result<Self> {
        let mut walk = Self {
            repo,
            cache,
            branch: branch.to_string(),
            detail,
            time_policy,
            queue: BinaryHeap::new(),
            seen: HashSet::new(),
            done: false,
        };
        walk.enqueue(tip)?;
        Ok(walk)
    }

    fn enqueue(&mut self, id: ObjectId) -> Result<()> {
        if !self.seen.insert(id) {
            return Ok(());
        }
        let seconds = self.repo.find_commit(id)?.time()?.seconds;
        self.queue.push((seconds, id));
        Ok(())
    }

    fn step(&mut self) -> Result<Option<CommitRecord>> {
        let Some((_, id)) = self.queue.pop() else {
            return Ok(None);
        };

        let commit = self.repo.find_commit(id)?;
        let time = commit.time()?;
        let (year, month) = year_month(time.seconds, time.offset, self.time_policy)?;
        let author = commit.author()?.name.to_string();
        let parents: Vec<ObjectId> = commit.parent_ids().map(|p| p.detach()).collect();

        let delta = match self.detail {
            Detail::Summary => CommitDelta::default(),
            Detail::Changes => self.delta_for(id, &parents)?,
        };

        for parent in parents {
            self.enqueue(parent)?;
        }

        Ok(Some(CommitRecord {
            id: id.to_string(),
            year,
            month,
            author,
            insertions: delta.insertions,
            deletions: delta.deletions,
            files: delta.paths.into_iter().map(TouchedFile::new).collect(),
        }))
    }

    fn delta_for(&self, id: ObjectId, parents: &[ObjectId]) -> Result<CommitDelta> {
        let key = id.to_string();
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }
        let delta = commit_delta(self.repo, id, parents)?;
        self.cache.put(&key, &delta)?;
        Ok(delta)
    }
}

impl Iterator for BranchCommits<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(commit)) => Some(Ok(commit)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(match err {
                    e @ GtallyError::Traversal { .. } => e,
                    other => GtallyError::traversal(&self.branch, other),
                }))
            }
        }
    }
}
