/// Bookmark persistence: saves/restores marked lines and notes per file.
///
/// Each file with bookmarks is one row in a redb table, keyed by path and
/// holding a bincode-encoded `FileSnapshot`.
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

/// Marks table: file path → bincode(`FileSnapshot`).
const MARKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("marks");

/// Stored bookmarks of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    /// Marked lines, ascending.
    pub lines: Vec<usize>,
    /// Notes keyed by marked line.
    pub notes: BTreeMap<usize, String>,
}

/// Stored bookmarks of every file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarksSnapshot {
    pub files: BTreeMap<String, FileSnapshot>,
}

impl MarksSnapshot {
    pub fn is_empty(&self) -> bool {
        self.files.values().all(|f| f.lines.is_empty())
    }
}

/// Persistence layer for bookmark state, backed by redb.
pub struct MarksStateStore {
    db: Database,
}

impl std::fmt::Debug for MarksStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarksStateStore").finish()
    }
}

impl MarksStateStore {
    /// Opens or creates the state database at `path`.
    ///
    /// Missing parent directories are created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open state database: {}", path.display()))?;

        // Ensure tables exist
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial state write transaction")?;
        {
            let _ = write_txn
                .open_table(MARKS_TABLE)
                .context("Failed to create marks table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial state transaction")?;

        Ok(Self { db })
    }

    /// Replaces the stored state with `snapshot`.
    ///
    /// Files without marked lines are not written.
    pub fn save_snapshot(&self, snapshot: &MarksSnapshot) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(MARKS_TABLE)
                .context("Failed to open marks table")?;

            let stale: Vec<String> = table
                .iter()
                .context("Failed to iterate marks table")?
                .filter_map(|entry| entry.ok().map(|(k, _)| k.value().to_string()))
                .collect();
            for key in &stale {
                table
                    .remove(key.as_str())
                    .with_context(|| format!("Failed to remove marks of {key}"))?;
            }

            for (path, file) in &snapshot.files {
                if file.lines.is_empty() {
                    continue;
                }
                let bytes = bincode::serialize(file)
                    .with_context(|| format!("Failed to serialize marks of {path}"))?;
                table
                    .insert(path.as_str(), bytes.as_slice())
                    .with_context(|| format!("Failed to insert marks of {path}"))?;
            }
        }
        write_txn.commit().context("Failed to commit marks")?;
        tracing::debug!("Saved bookmarks for {} file(s)", snapshot.files.len());
        Ok(())
    }

    /// Loads every stored file. Empty on first run.
    pub fn load_snapshot(&self) -> Result<MarksSnapshot> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(MARKS_TABLE)
            .context("Failed to open marks table")?;

        let mut snapshot = MarksSnapshot::default();
        for entry in table.iter().context("Failed to iterate marks table")? {
            let (key, value) = entry.context("Failed to read marks entry")?;
            let path = key.value().to_string();
            let file: FileSnapshot = bincode::deserialize(value.value())
                .with_context(|| format!("Failed to deserialize marks of {path}"))?;
            snapshot.files.insert(path, file);
        }
        Ok(snapshot)
    }

    /// Loads the stored marks of one file, or `None` if it has none.
    pub fn load_file(&self, path: &str) -> Result<Option<FileSnapshot>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(MARKS_TABLE)
            .context("Failed to open marks table")?;

        match table.get(path).context("Failed to read marks")? {
            Some(guard) => {
                let file: FileSnapshot = bincode::deserialize(guard.value())
                    .with_context(|| format!("Failed to deserialize marks of {path}"))?;
                Ok(Some(file))
            }
            None => Ok(None),
        }
    }

    /// Wipes all stored bookmarks.
    pub fn clear(&self) -> Result<()> {
        self.save_snapshot(&MarksSnapshot::default())
    }
}
