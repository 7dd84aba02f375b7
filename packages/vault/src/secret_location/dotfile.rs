//! Pointer-file storage for the secret location

use super::LocationStore;
use crate::error::VaultResult;
use crate::security::atomic_replace;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct LocationRecord {
    secret_path: PathBuf,
}

/// Remembers the secret location in a small JSON file at a fixed path
#[derive(Debug, Clone)]
pub struct DotfileLocationStore {
    pointer: PathBuf,
}

impl DotfileLocationStore {
    pub fn new(pointer: impl Into<PathBuf>) -> Self {
        Self {
            pointer: pointer.into(),
        }
    }

    pub fn pointer(&self) -> &Path {
        &self.pointer
    }
}

impl LocationStore for DotfileLocationStore {
    fn load(&self) -> VaultResult<Option<PathBuf>> {
        if !self.pointer.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&self.pointer)?;
        let record: LocationRecord = serde_json::from_slice(&bytes)?;
        Ok(Some(record.secret_path))
    }

    fn persist(&self, path: &Path) -> VaultResult<()> {
        let record = LocationRecord {
            secret_path: path.to_path_buf(),
        };
        atomic_replace(&self.pointer, &serde_json::to_vec_pretty(&record)?)?;
        log::debug!("Persisted secret location pointer: {}", self.pointer.display());
        Ok(())
    }
}
