//! PIN persistence
//!
//! The PIN lives in a small JSON file, `{"pin": "<digits>"}`. Loading never
//! fails: anything unusable is replaced by the default PIN. Format checks
//! belong to the session, not to this store.

use crate::error::VaultResult;
use crate::security::atomic_replace;
use log::{debug, warn};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct PinRecord {
    pin: String,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    default_pin: String,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>, default_pin: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_pin: default_pin.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a PIN file has been written before
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the stored PIN, writing and returning the default when it is
    /// missing, unreadable or malformed
    pub fn load(&self) -> SecretString {
        match self.read() {
            Ok(pin) => return pin,
            Err(e) if self.path.exists() => warn!("PIN file unusable, resetting to default: {e}"),
            Err(_) => debug!("No PIN file yet, writing default"),
        }

        if let Err(e) = self.save(&self.default_pin) {
            warn!("Failed to write default PIN file {}: {e}", self.path.display());
        }

        SecretString::from(self.default_pin.clone())
    }

    /// Persist `pin` atomically
    ///
    /// # Errors
    /// Returns `VaultError::Io` when the file cannot be written; the
    /// previous file is left untouched in that case.
    pub fn save(&self, pin: &str) -> VaultResult<()> {
        let record = PinRecord {
            pin: pin.to_string(),
        };
        let bytes = Zeroizing::new(serde_json::to_vec(&record)?);
        atomic_replace(&self.path, &bytes)?;
        Ok(())
    }

    fn read(&self) -> VaultResult<SecretString> {
        let bytes = Zeroizing::new(std::fs::read(&self.path)?);
        let mut record: PinRecord = serde_json::from_slice(&bytes)?;
        Ok(SecretString::from(std::mem::take(&mut record.pin)))
    }
}
