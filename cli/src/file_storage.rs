//! Session persistence for the CLI: a JSON object of string entries on disk.
//!
//! Holds the same two keys the browser keeps in `localStorage`. A missing
//! or unreadable file reads as empty; write failures are logged and the
//! in-memory session carries on.

#[cfg(test)]
#[path = "file_storage_test.rs"]
mod file_storage_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use portal::Storage;

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> BTreeMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
            BTreeMap::new()
        })
    }

    fn write(&self, entries: &BTreeMap<String, String>) {
        let result = if entries.is_empty() {
            match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            }
        } else {
            serde_json::to_string_pretty(entries)
                .map_err(std::io::Error::other)
                .and_then(|json| std::fs::write(&self.path, json))
        };
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write session file");
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.read();
        entries.insert(key.to_owned(), value.to_owned());
        self.write(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.read();
        if entries.remove(key).is_some() {
            self.write(&entries);
        }
    }
}
