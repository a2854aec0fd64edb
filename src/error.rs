use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GtallyError>;

#[derive(Error, Debug)]
pub enum GtallyError {
    #[error("Repository not found at {}: {reason}", path.display())]
    RepositoryNotFound { path: PathBuf, reason: String },
    #[error("Repository state error: {0}")]
    RepositoryState(String),
    #[error("Traversal of branch '{branch}' failed: {message}")]
    Traversal { branch: String, message: String },
    #[error("Export to {} failed: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

impl GtallyError {
    /// Wraps any backend failure that happened while walking `branch`.
    pub fn traversal(branch: &str, err: impl std::fmt::Display) -> Self {
        GtallyError::Traversal {
            branch: branch.to_string(),
            message: err.to_string(),
        }
    }

    /// Structural errors abort a run regardless of the failure policy.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GtallyError::RepositoryNotFound { .. } | GtallyError::RepositoryState(_)
        )
    }
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::object::find::existing::Error> for GtallyError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        GtallyError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GtallyError {
    fn from(err: gix::object::commit::Error) -> Self {
        GtallyError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GtallyError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GtallyError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GtallyError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GtallyError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for GtallyError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        GtallyError::DiffTreeToTree(Box::new(err))
    }
}
