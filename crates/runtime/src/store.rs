//! Flag store persisted as a JSON object on disk.
//!
//! Stands in for the browser's device-scoped storage: flags written by one
//! activation are visible to the next one that opens the same file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use proofwall_core::gate::FlagStore;

#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileFlagStore {
    /// Load the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and also treated as empty; it is overwritten on the next
    /// successful [`FlagStore::set`].
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values: BTreeMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Flag store is not valid JSON; starting empty",
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read flag store; starting empty",
                );
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.values).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, json).map_err(|e| e.to_string())
    }
}

impl FlagStore for FileFlagStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        let previous = self.values.insert(key.to_string(), value.to_string());
        match self.persist() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to write flag store",
                );
                // Keep memory consistent with what is on disk.
                match previous {
                    Some(old) => self.values.insert(key.to_string(), old),
                    None => self.values.remove(key),
                };
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
