pub mod credentials;
pub mod json_backend;

use std::{
    io,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use crate::{
    errors::{LedgerError, Result},
    ledger::TransactionStore,
};

/// Outcome of reading the transaction file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub store: TransactionStore,
    /// Records that were skipped or repaired while loading.
    pub warnings: Vec<String>,
    /// Untouched copy of the file, kept when records had to be skipped.
    pub preserved_copy: Option<PathBuf>,
}

/// Abstraction over persistence backends for the transaction file.
pub trait StorageBackend: Send + Sync {
    /// Reads all persisted transactions. A missing file yields an empty store;
    /// an unreadable or structurally invalid one yields `CorruptData`.
    fn load(&self) -> Result<LoadReport>;
    /// Persists the store. On failure the previously saved data stays intact.
    fn save(&self, store: &TransactionStore) -> Result<()>;
}

/// Keeps everything in memory; useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Option<TransactionStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<TransactionStore>>> {
        self.saved.lock().map_err(|_| {
            LedgerError::Io(io::Error::new(
                io::ErrorKind::Other,
                "in-memory storage lock poisoned",
            ))
        })
    }

    /// Number of records in the last saved snapshot, if any.
    pub fn saved_len(&self) -> Option<usize> {
        self.saved
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(TransactionStore::len))
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<LoadReport> {
        let store = self.lock()?.clone().unwrap_or_default();
        Ok(LoadReport {
            store,
            ..LoadReport::default()
        })
    }

    fn save(&self, store: &TransactionStore) -> Result<()> {
        *self.lock()? = Some(store.clone());
        Ok(())
    }
}

pub use credentials::CredentialFile;
pub use json_backend::{JsonStorage, StoredTransaction, TransactionFile};
