//! Local fallback store for confirmed submissions.
//!
//! The browser original kept a localStorage backup of signups whose network
//! call succeeded; here that is a small JSON document on disk. The store is
//! non-authoritative and never reconciled with the server ledger.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One locally remembered signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackEntry {
    pub email: String,
    pub timestamp: String,
    pub source: String,
}

/// Errors that can occur reading or writing the fallback store.
#[derive(Debug, Error)]
pub enum FallbackError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The fallback file does not hold a JSON entry array.
    #[error("malformed fallback file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// JSON-file-backed fallback store.
#[derive(Debug, Clone)]
pub struct FallbackStore {
    path: PathBuf,
}

impl FallbackStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All remembered entries. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or does not parse.
    pub fn entries(&self) -> Result<Vec<FallbackEntry>, FallbackError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remember an entry unless its exact email is already present.
    ///
    /// Returns whether the entry was added.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read or written.
    pub fn record(&self, entry: FallbackEntry) -> Result<bool, FallbackError> {
        let mut entries = self.entries()?;

        if entries.iter().any(|e| e.email == entry.email) {
            return Ok(false);
        }

        entries.push(entry);
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(email: &str) -> FallbackEntry {
        FallbackEntry {
            email: email.to_string(),
            timestamp: "2025-06-01T12:00:00Z".to_string(),
            source: "nigela_beta_landing".to_string(),
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path().join("signups.json"));

        assert!(store.entries().unwrap().is_empty());
    }

    #[test]
    fn test_record_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path().join("signups.json"));

        assert!(store.record(entry("a@b.com")).unwrap());

        let reloaded = FallbackStore::new(store.path()).entries().unwrap();
        assert_eq!(reloaded, vec![entry("a@b.com")]);
    }

    #[test]
    fn test_record_skips_duplicate_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = FallbackStore::new(dir.path().join("signups.json"));

        assert!(store.record(entry("a@b.com")).unwrap());
        assert!(!store.record(entry("a@b.com")).unwrap());
        assert!(store.record(entry("c@d.com")).unwrap());

        assert_eq!(store.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signups.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FallbackStore::new(path);
        assert!(matches!(store.entries(), Err(FallbackError::Malformed(_))));
    }
}
