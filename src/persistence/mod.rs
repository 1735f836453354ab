//! Score persistence
//!
//! Features:
//! - `Persistence` capability injected into the session
//! - Key/value `Storage` backends (LocalStorage on web, memory elsewhere)
//! - Failures are logged and swallowed; corrupt data reads as empty

use std::collections::HashMap;
use std::fmt;

use crate::history::{HistoryEntry, ScoreHistory};

/// Storage key for the score history
pub const HISTORY_KEY: &str = "bubble_sum_history";

/// Persistence collaborator seen by the session
pub trait Persistence {
    /// Append a finished run's score. Must not fail loudly.
    fn save_score(&mut self, score: u64);
    /// Recorded runs, most recent first
    fn load_history(&self) -> Vec<HistoryEntry>;
}

/// Why a storage write failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend available (private mode, no window)
    Unavailable,
    /// Backend refused the write (quota)
    Rejected(String),
    /// Value could not be encoded
    Encode,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Rejected(reason) => write!(f, "storage rejected write: {reason}"),
            Self::Encode => write!(f, "value could not be encoded"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Minimal string key/value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory storage (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn backend() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::backend()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::backend().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }
}

/// Score history kept in a `Storage` backend
#[derive(Debug, Clone, Default)]
pub struct HistoryStore<S: Storage> {
    storage: S,
}

impl<S: Storage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Full history, empty if missing or unreadable
    pub fn history(&self) -> ScoreHistory {
        self.storage
            .get(HISTORY_KEY)
            .map(|json| ScoreHistory::from_json(&json))
            .unwrap_or_default()
    }

    fn record(&mut self, score: u64, timestamp: f64) -> Result<(), StorageError> {
        let mut history = self.history();
        history.record(score, timestamp);
        let json = history.to_json().ok_or(StorageError::Encode)?;
        self.storage.set(HISTORY_KEY, &json)?;
        log::info!("Score {} saved ({} runs on record)", score, history.len());
        Ok(())
    }
}

impl<S: Storage> Persistence for HistoryStore<S> {
    fn save_score(&mut self, score: u64) {
        if let Err(e) = self.record(score, crate::platform::now_ms()) {
            log::warn!("Could not save score {}: {}", score, e);
        }
    }

    fn load_history(&self) -> Vec<HistoryEntry> {
        self.history().entries().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage that refuses every write
    struct FullStorage;

    impl Storage for FullStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected("quota exceeded".into()))
        }
    }

    #[test]
    fn test_save_and_load() {
        let mut store = HistoryStore::new(MemoryStorage::new());
        store.save_score(40);
        store.save_score(90);
        let history = store.load_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].score, 90);
        assert_eq!(history[1].score, 40);
    }

    #[test]
    fn test_corrupt_storage_reads_empty() {
        let mut storage = MemoryStorage::new();
        storage.set(HISTORY_KEY, "{\"oops\":").unwrap();
        let mut store = HistoryStore::new(storage);
        assert!(store.load_history().is_empty());

        // And recovers on the next save
        store.save_score(5);
        assert_eq!(store.load_history().len(), 1);
    }

    #[test]
    fn test_write_failure_swallowed() {
        let mut store = HistoryStore::new(FullStorage);
        store.save_score(10);
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(StorageError::Unavailable.to_string(), "storage unavailable");
        assert_eq!(
            StorageError::Rejected("quota".into()).to_string(),
            "storage rejected write: quota"
        );
    }
}
