use crate::error::{GtallyError, Result};
use crate::model::{CommitDelta, SCHEMA_VERSION};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Per-commit change detail keyed by commit id.
///
/// Commits are immutable, so an entry is valid forever once written.
pub struct DeltaCache {
    conn: Connection,
}

impl DeltaCache {
    /// Cache that lives for the duration of the run.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    /// Cache persisted as `deltas.db` inside `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("deltas.db"))?;
        let mut cache = Self { conn };
        cache.initialize()?;
        Ok(cache)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS deltas (
                id TEXT PRIMARY KEY,
                insertions INTEGER NOT NULL,
                deletions INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS delta_files (
                commit_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                path TEXT NOT NULL,
                PRIMARY KEY (commit_id, seq),
                FOREIGN KEY (commit_id) REFERENCES deltas(id)
            );
            ",
        )?;
        self.check_schema_version()
    }

    fn check_schema_version(&mut self) -> Result<()> {
        let user_version: i64 = self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?;

        if user_version == 0 {
            let set_stmt = format!("PRAGMA user_version = {SCHEMA_VERSION};");
            self.conn.execute_batch(&set_stmt)?;
        } else if user_version != SCHEMA_VERSION as i64 {
            return Err(GtallyError::Cache(format!(
                "Schema version mismatch: expected {}, found {}",
                SCHEMA_VERSION, user_version
            )));
        }

        Ok(())
    }

    pub fn get(&self, commit_id: &str) -> Result<Option<CommitDelta>> {
        let counts: Option<(i64, i64)> = self
            .conn
            .query_row(
                "SELECT insertions, deletions FROM deltas WHERE id = ?1",
                params![commit_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((insertions, deletions)) = counts else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare_cached("SELECT path FROM delta_files WHERE commit_id = ?1 ORDER BY seq")?;
        let paths = stmt
            .query_map(params![commit_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some(CommitDelta {
            insertions: insertions as u64,
            deletions: deletions as u64,
            paths,
        }))
    }

    pub fn put(&self, commit_id: &str, delta: &CommitDelta) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO deltas (id, insertions, deletions) VALUES (?1, ?2, ?3)",
            params![commit_id, delta.insertions as i64, delta.deletions as i64],
        )?;
        tx.execute("DELETE FROM delta_files WHERE commit_id = ?1", params![commit_id])?;
        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO delta_files (commit_id, seq, path) VALUES (?1, ?2, ?3)")?;
            for (seq, path) in delta.paths.iter().enumerate() {
                stmt.execute(params![commit_id, seq as i64, path])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let n: i64 = self.conn.query_row("SELECT COUNT(*) FROM deltas", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn delta() -> CommitDelta {
        CommitDelta {
            insertions: 12,
            deletions: 4,
            paths: vec!["src/main.rs".into(), "README.md".into()],
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = DeltaCache::in_memory().unwrap();
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.get("abc").unwrap(), None);
        cache.put("abc", &delta()).unwrap();
        assert_eq!(cache.get("abc").unwrap(), Some(delta()));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn rewriting_an_entry_replaces_paths() {
        let cache = DeltaCache::in_memory().unwrap();
        cache.put("abc", &delta()).unwrap();
        let smaller = CommitDelta { insertions: 1, deletions: 0, paths: vec!["only.rs".into()] };
        cache.put("abc", &smaller).unwrap();
        assert_eq!(cache.get("abc").unwrap(), Some(smaller));
    }

    #[test]
    fn persisted_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        DeltaCache::open(dir.path()).unwrap().put("abc", &delta()).unwrap();
        let reopened = DeltaCache::open(dir.path()).unwrap();
        assert_eq!(reopened.get("abc").unwrap(), Some(delta()));
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        {
            let conn = Connection::open(dir.path().join("deltas.db")).unwrap();
            conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        }
        assert!(matches!(DeltaCache::open(dir.path()), Err(GtallyError::Cache(_))));
    }
}
