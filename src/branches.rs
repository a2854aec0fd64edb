use crate::error::Result;
use crate::model::BranchScope;
use crate::source::CommitSource;
use std::collections::BTreeSet;
use tracing::debug;

/// Sorted, de-duplicated branch names visible under `scope`.
///
/// Symbolic remote heads (`origin/HEAD`) are skipped: they only alias
/// another remote-tracking branch.
pub fn enumerate_branches<S: CommitSource + ?Sized>(source: &S, scope: BranchScope) -> Result<Vec<String>> {
    let names: BTreeSet<String> = source
        .list_branches()?
        .into_iter()
        .filter(|b| match scope {
            BranchScope::All => true,
            BranchScope::Local => !b.remote,
            BranchScope::Remote => b.remote,
        })
        .filter(|b| !(b.remote && (b.name == "HEAD" || b.name.ends_with("/HEAD"))))
        .map(|b| b.name)
        .collect();

    debug!(count = names.len(), ?scope, "enumerated branches");
    Ok(names.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BranchRef, MemorySource};
    use pretty_assertions::assert_eq;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_branch(BranchRef::local("main"), vec![])
            .with_branch(BranchRef::remote("origin/HEAD"), vec![])
            .with_branch(BranchRef::remote("origin/main"), vec![])
            .with_branch(BranchRef::local("feature"), vec![])
            .with_branch(BranchRef::local("main"), vec![])
    }

    #[test]
    fn all_scope_is_sorted_and_unique() {
        let names = enumerate_branches(&source(), BranchScope::All).unwrap();
        assert_eq!(names, vec!["feature", "main", "origin/main"]);
    }

    #[test]
    fn scopes_filter_by_kind() {
        assert_eq!(
            enumerate_branches(&source(), BranchScope::Local).unwrap(),
            vec!["feature", "main"]
        );
        assert_eq!(
            enumerate_branches(&source(), BranchScope::Remote).unwrap(),
            vec!["origin/main"]
        );
    }

    #[test]
    fn empty_source_has_no_branches() {
        assert!(enumerate_branches(&MemorySource::new(), BranchScope::All).unwrap().is_empty());
    }
}
