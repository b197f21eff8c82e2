//! Username to password map kept for the sign-in screen.
//!
//! The ledger itself never touches this file; it lives here so the
//! application has one place for its JSON persistence.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::errors::{LedgerError, Result};

use super::json_backend::{sibling_path, write_synced};

pub type Credentials = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file yields an empty map; anything that is not a flat
    /// string-to-string object is `CorruptData`.
    pub fn load(&self) -> Result<Credentials> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Credentials::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&data).map_err(|err| {
            LedgerError::CorruptData(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        let json = serde_json::to_string_pretty(credentials)?;
        let tmp = sibling_path(&self.path, "tmp");
        write_synced(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
