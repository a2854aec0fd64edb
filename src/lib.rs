//! Commit-history statistics across every branch of a git repository.
//!
//! Two pipelines share one shape: enumerate branches, walk each branch's
//! commits through a [`source::CommitSource`], fold them into an aggregator,
//! export. [`timeline`] counts commits per year and month over all branches;
//! [`metrics`] keeps commit, author, file and line totals per branch.

pub mod branches;
pub mod cache;
pub mod cli;
pub mod error;
pub mod git;
pub mod metrics;
pub mod model;
pub mod scan;
pub mod source;
pub mod timeline;
pub mod util;

pub use error::{GtallyError, Result};
