use super::walk::BranchCommits;
use crate::cache::DeltaCache;
use crate::error::{GtallyError, Result};
use crate::model::{Detail, TimePolicy};
use crate::source::{BranchRef, CommitSource, CommitStream};
use gix::{discover, ObjectId, Repository};
use std::path::Path;
use tracing::debug;

/// gix-backed [`CommitSource`]. Reads references and objects only; the
/// working tree and `HEAD` are never touched.
pub struct GitRepo {
    repo: Repository,
    cache: DeltaCache,
    time_policy: TimePolicy,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        if !repo_path.exists() {
            return Err(GtallyError::RepositoryNotFound {
                path: repo_path,
                reason: "path does not exist".to_string(),
            });
        }

        let repo = discover(&repo_path).map_err(|e| GtallyError::RepositoryNotFound {
            path: repo_path.clone(),
            reason: e.to_string(),
        })?;

        if repo.is_bare() {
            return Err(GtallyError::RepositoryState(format!(
                "the repository at '{}' is bare; a working repository is required",
                repo_path.display()
            )));
        }

        let workdir = repo.workdir().unwrap_or_else(|| repo.path());
        debug!(path = %workdir.display(), "opened repository");

        Ok(Self {
            repo,
            cache: DeltaCache::in_memory()?,
            time_policy: TimePolicy::default(),
        })
    }

    pub fn with_cache(mut self, cache: DeltaCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_time_policy(mut self, time_policy: TimePolicy) -> Self {
        self.time_policy = time_policy;
        self
    }

    fn resolve_tip(&self, branch: &str) -> Result<ObjectId> {
        for full_name in [format!("refs/heads/{branch}"), format!("refs/remotes/{branch}")] {
            let found = self
                .repo
                .try_find_reference(full_name.as_str())
                .map_err(|e| GtallyError::traversal(branch, e))?;
            if let Some(mut reference) = found {
                let id = reference
                    .peel_to_id_in_place()
                    .map_err(|e| GtallyError::traversal(branch, e))?;
                return Ok(id.detach());
            }
        }
        Err(GtallyError::traversal(branch, "no such branch"))
    }
}

impl CommitSource for GitRepo {
    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        let platform = self
            .repo
            .references()
            .map_err(|e| GtallyError::GitRepo(format!("Failed to read references: {e}")))?;

        let mut branches = Vec::new();
        let local = platform
            .local_branches()
            .map_err(|e| GtallyError::GitRepo(format!("Failed to list local branches: {e}")))?;
        for reference in local {
            let reference = reference.map_err(|e| GtallyError::GitRepo(e.to_string()))?;
            branches.push(BranchRef::local(reference.name().shorten().to_string()));
        }

        let remote = platform
            .remote_branches()
            .map_err(|e| GtallyError::GitRepo(format!("Failed to list remote branches: {e}")))?;
        for reference in remote {
            let reference = reference.map_err(|e| GtallyError::GitRepo(e.to_string()))?;
            branches.push(BranchRef::remote(reference.name().shorten().to_string()));
        }

        Ok(branches)
    }

    fn commits_of(&mut self, branch: &str, detail: Detail) -> Result<CommitStream<'_>> {
        let tip = self.resolve_tip(branch)?;
        debug!(%branch, %tip, ?detail, "walking branch");
        let walk = BranchCommits::new(&self.repo, &self.cache, branch, tip, detail, self.time_policy)?;
        Ok(Box::new(walk))
    }
}
