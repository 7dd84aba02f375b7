//! Title-keyed record persistence
//!
//! The data file is a JSON object mapping each title to
//! `{"content": ..., "file_name": ...}`. Older files that map a title
//! straight to its content string are still accepted on load.

use crate::error::VaultResult;
use crate::security::atomic_replace;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Records keyed by title; iteration order is the display order
pub type VaultRecords = BTreeMap<String, VaultEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredEntry")]
pub struct VaultEntry {
    pub content: String,
    /// Name of the attachment inside the vault's files directory
    pub file_name: Option<String>,
}

impl VaultEntry {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_name: None,
        }
    }

    pub fn with_attachment(content: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file_name: Some(file_name.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Full {
        content: String,
        #[serde(default)]
        file_name: Option<String>,
    },
    Plain(String),
}

impl From<StoredEntry> for VaultEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored {
            StoredEntry::Full { content, file_name } => Self { content, file_name },
            StoredEntry::Plain(content) => Self::new(content),
        }
    }
}

/// JSON file holding every record of the vault
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all records; a missing or unreadable file is an empty vault
    pub fn load(&self) -> VaultRecords {
        if !self.path.exists() {
            return VaultRecords::new();
        }

        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Vault data unreadable, starting empty: {e}");
                VaultRecords::new()
            }
        }
    }

    /// Load all records, reporting why the file could not be used
    pub fn try_load(&self) -> VaultResult<VaultRecords> {
        Self::read_from(&self.path)
    }

    /// Parse a record file at an arbitrary path (used for restores)
    pub fn read_from(path: &Path) -> VaultResult<VaultRecords> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Persist `records` atomically, pretty-printed with Unicode kept as-is
    pub fn save(&self, records: &VaultRecords) -> VaultResult<()> {
        let json = serde_json::to_vec_pretty(records)?;
        atomic_replace(&self.path, &json)?;
        Ok(())
    }

    /// Replace the stored records with an empty set
    pub fn wipe(&self) -> VaultResult<()> {
        self.save(&VaultRecords::new())
    }
}
