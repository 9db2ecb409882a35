use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::DataLoadError;
use super::loader;
use super::model::EmployeeTable;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// Identifies one version of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl SourceKey {
    /// Stat `path`. Fails when the file is missing or unreadable.
    pub fn of(path: &Path) -> Result<Self, DataLoadError> {
        let io_err = |source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = path.canonicalize().map_err(io_err)?;
        let meta = std::fs::metadata(&canonical).map_err(io_err)?;
        Ok(SourceKey {
            path: canonical,
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// TableCache
// ---------------------------------------------------------------------------

/// Loaded tables keyed by source identity. One entry per path; a changed
/// modification time or size replaces it on the next lookup.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, (SourceKey, Arc<EmployeeTable>)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<EmployeeTable>, DataLoadError> {
        let key = SourceKey::of(path)?;

        if let Some((cached_key, table)) = self.entries.get(&key.path) {
            if *cached_key == key {
                log::debug!("Table cache hit for {}", key.path.display());
                return Ok(Arc::clone(table));
            }
            log::debug!("{} changed on disk, reloading", key.path.display());
        }

        let table = Arc::new(loader::load(&key.path)?);
        self.entries
            .insert(key.path.clone(), (key, Arc::clone(&table)));
        Ok(table)
    }

    /// Drop the entry for `path`, if any. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
