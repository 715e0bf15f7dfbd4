//! Assignment history store. Newest entry first.

use crate::json_file::{JsonListFile, Records};
use ruleta_core::HistoryEntry;
use ruleta_core::error::Result;
use std::path::{Path, PathBuf};

pub struct HistoryStore {
    file: JsonListFile<HistoryEntry>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonListFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn list(&self) -> Vec<HistoryEntry> {
        self.file.load()
    }

    /// Most recent entry, if any.
    pub fn latest(&self) -> Option<HistoryEntry> {
        self.list().into_iter().next()
    }

    pub fn clear(&self) -> Result<()> {
        self.file.save(&[])?;
        tracing::info!("🧹 History cleared");
        Ok(())
    }

    /// Insert `entry` at the front.
    pub fn prepend(&self, entry: HistoryEntry) -> Result<()> {
        self.file.modify(|history| history.insert(0, &entry))
    }

    /// Read-modify-write under the history lock.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Records<HistoryEntry>) -> Result<R>) -> Result<R> {
        self.file.modify(f)
    }
}
