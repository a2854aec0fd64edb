use crate::error::Result;
use crate::model::CommitDelta;
use gix::object::tree::diff::ChangeDetached;
use gix::objs::tree::EntryMode;
use gix::{ObjectId, Repository};
use similar::{ChangeTag, TextDiff};

const BINARY_PROBE: usize = 8192;

/// Touched paths and line counts of `commit_id` against its first parent,
/// or against the empty tree for a root commit.
///
/// Merge commits keep their first-parent line counts but report no touched
/// paths: the files they bring in are already counted on the commits that
/// changed them.
pub fn commit_delta(repo: &Repository, commit_id: ObjectId, parents: &[ObjectId]) -> Result<CommitDelta> {
    let commit_tree = repo.find_commit(commit_id)?.tree()?;
    let changes: Vec<ChangeDetached> = match parents.first().copied() {
        Some(parent_id) => {
            let parent_tree = repo.find_commit(parent_id)?.tree()?;
            repo.diff_tree_to_tree(Some(&parent_tree), Some(&commit_tree), None)?
        }
        None => repo.diff_tree_to_tree(None, Some(&commit_tree), None)?,
    };

    let mut delta = CommitDelta::default();
    for change in changes {
        apply_change(repo, change, &mut delta)?;
    }
    if parents.len() > 1 {
        delta.paths.clear();
    }
    Ok(delta)
}

fn apply_change(repo: &Repository, change: ChangeDetached, delta: &mut CommitDelta) -> Result<()> {
    let (path, (added, removed)) = match change {
        ChangeDetached::Addition { location, entry_mode, id, .. } => {
            if !is_file(entry_mode) {
                return Ok(());
            }
            (location.to_string(), line_changes(b"", &blob_data(repo, id)?))
        }
        ChangeDetached::Deletion { location, entry_mode, id, .. } => {
            if !is_file(entry_mode) {
                return Ok(());
            }
            (location.to_string(), line_changes(&blob_data(repo, id)?, b""))
        }
        ChangeDetached::Modification { location, previous_entry_mode, previous_id, entry_mode, id, .. } => {
            if !is_file(previous_entry_mode) && !is_file(entry_mode) {
                return Ok(());
            }
            let old = file_data(repo, previous_entry_mode, previous_id)?;
            let new = file_data(repo, entry_mode, id)?;
            (location.to_string(), line_changes(&old, &new))
        }
        ChangeDetached::Rewrite { source_entry_mode, source_id, entry_mode, id, location, copy, .. } => {
            if !is_file(source_entry_mode) && !is_file(entry_mode) {
                return Ok(());
            }
            let old = file_data(repo, source_entry_mode, source_id)?;
            let new = file_data(repo, entry_mode, id)?;
            (location.to_string(), rewrite_line_changes(&old, &new, copy))
        }
    };

    delta.insertions += added;
    delta.deletions += removed;
    delta.paths.push(path);
    Ok(())
}

/// Lines of a rename or copy, counted as if rename detection were off: the
/// destination is added in full and a renamed source is removed in full.
/// Only the destination path is reported as touched.
pub fn rewrite_line_changes(old: &[u8], new: &[u8], copy: bool) -> (u64, u64) {
    let (added, _) = line_changes(b"", new);
    let removed = if copy { 0 } else { line_changes(old, b"").1 };
    (added, removed)
}

fn is_file(mode: EntryMode) -> bool {
    !mode.is_tree() && !mode.is_commit()
}

fn file_data(repo: &Repository, mode: EntryMode, id: ObjectId) -> Result<Vec<u8>> {
    if is_file(mode) {
        blob_data(repo, id)
    } else {
        Ok(Vec::new())
    }
}

fn blob_data(repo: &Repository, id: ObjectId) -> Result<Vec<u8>> {
    Ok(repo.find_object(id)?.detach().data)
}

fn is_binary(data: &[u8]) -> bool {
    data.iter().take(BINARY_PROBE).any(|&b| b == 0)
}

/// Lines added and removed between two blob contents. Binary content on
/// either side counts as no line change.
pub fn line_changes(old: &[u8], new: &[u8]) -> (u64, u64) {
    if is_binary(old) || is_binary(new) {
        return (0, 0);
    }
    let old_text = String::from_utf8_lossy(old);
    let new_text = String::from_utf8_lossy(new);
    let diff = TextDiff::from_lines(old_text.as_ref(), new_text.as_ref());

    let mut added = 0u64;
    let mut removed = 0u64;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => added += 1,
            ChangeTag::Delete => removed += 1,
            ChangeTag::Equal => {}
        }
    }
    (added, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_file_counts_every_line() {
        assert_eq!(line_changes(b"", b"a\nb\nc\n"), (3, 0));
    }

    #[test]
    fn deleted_file_counts_every_line() {
        assert_eq!(line_changes(b"a\nb\n", b""), (0, 2));
    }

    #[test]
    fn modified_line_is_one_add_one_remove() {
        assert_eq!(line_changes(b"a\nb\nc\n", b"a\nB\nc\n"), (1, 1));
    }

    #[test]
    fn rename_counts_both_sides_in_full() {
        assert_eq!(rewrite_line_changes(b"1\n2\n3\n4\n5\n", b"1\n2\n3\n4\n5\n", false), (5, 5));
    }

    #[test]
    fn copy_keeps_the_source() {
        assert_eq!(rewrite_line_changes(b"a\nb\n", b"a\nb\nc\n", true), (3, 0));
    }

    #[test]
    fn binary_content_has_no_lines() {
        assert_eq!(line_changes(b"\x00\x01\x02", b"text\n"), (0, 0));
    }
}
