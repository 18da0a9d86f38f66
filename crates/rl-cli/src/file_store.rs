//! Preference store with a JSON-file durable scope.
//!
//! The session scope only lives for one replay, like a tab's
//! `sessionStorage`; the durable scope is loaded from and saved to a flat
//! JSON object so blocks carry over between runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rl_core::{MemoryStore, PreferenceStore, Scope, StorageError};

pub struct FileStore {
    path: Option<PathBuf>,
    inner: MemoryStore,
}

impl FileStore {
    /// In-memory only.
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            inner: MemoryStore::new(),
        }
    }

    pub fn open(path: &Path) -> Result<Self, String> {
        let mut inner = MemoryStore::new();

        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
            let entries: BTreeMap<String, String> = serde_json::from_str(&content)
                .map_err(|e| format!("Invalid state file '{}': {}", path.display(), e))?;
            for (key, value) in &entries {
                inner.insert_raw(Scope::Durable, key, value);
            }
        }

        Ok(Self {
            path: Some(path.to_path_buf()),
            inner,
        })
    }

    pub fn save(&self) -> Result<(), String> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        let entries: BTreeMap<String, String> =
            self.inner.entries(Scope::Durable).into_iter().collect();
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| format!("Failed to serialize state: {}", e))?;
        fs::write(path, json)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
    }
}

impl PreferenceStore for FileStore {
    fn read_raw(&self, scope: Scope, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read_raw(scope, key)
    }

    fn write_raw(&mut self, scope: Scope, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.write_raw(scope, key, value)
    }
}
