//! OS credential-store backed secret location
//!
//! Uses the operating system's credential storage through `keyring`:
//! - Windows: Credential Manager
//! - macOS: Keychain Access
//! - Linux: Secret Service API

use super::LocationStore;
use crate::error::{VaultError, VaultResult};
use std::path::{Path, PathBuf};

/// Credential entry name holding the secret location path
pub const SECRET_PATH_ENTRY: &str = "secret_path";

/// Keychain storage for the secret location
///
/// One entry per installation: `service` / [`SECRET_PATH_ENTRY`], whose
/// secret is the absolute directory path.
pub struct KeychainLocationStore {
    service: String,
    entry: keyring::Entry,
}

impl std::fmt::Debug for KeychainLocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainLocationStore")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl KeychainLocationStore {
    /// Open the credential entry for `service`
    ///
    /// # Errors
    /// Returns `VaultError::Keychain` if the platform store rejects the entry
    pub fn new(service: impl Into<String>) -> VaultResult<Self> {
        let service = service.into();
        let entry = keyring::Entry::new(&service, SECRET_PATH_ENTRY)?;
        Ok(Self { service, entry })
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl LocationStore for KeychainLocationStore {
    fn load(&self) -> VaultResult<Option<PathBuf>> {
        match self.entry.get_password() {
            Ok(path) if path.trim().is_empty() => Ok(None),
            Ok(path) => Ok(Some(PathBuf::from(path))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, path: &Path) -> VaultResult<()> {
        let value = path.to_str().ok_or_else(|| {
            VaultError::Configuration(format!(
                "Secret location is not valid UTF-8: {}",
                path.display()
            ))
        })?;

        self.entry.set_password(value)?;
        log::debug!("Persisted secret location in keychain service {}", self.service);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret_location::SecretLocationResolver;
    use tempfile::TempDir;

    fn mock_store(service: &str) -> KeychainLocationStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeychainLocationStore::new(service).unwrap()
    }

    #[test]
    fn test_empty_entry_loads_as_none() {
        let store = mock_store("pinvault-test-empty");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_persist_then_load() {
        let store = mock_store("pinvault-test-roundtrip");
        let path = PathBuf::from("/home/user/.vault_backup");

        store.persist(&path).unwrap();

        assert_eq!(store.load().unwrap(), Some(path));
    }

    #[test]
    fn test_resolver_with_keychain_strategy() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join(".vault_backup");
        let store = mock_store("pinvault-test-resolver");
        let resolver = SecretLocationResolver::new(&store, &fallback);

        assert_eq!(resolver.resolve(), fallback);
        assert_eq!(resolver.resolve(), fallback);
        assert_eq!(store.load().unwrap(), Some(fallback));
    }
}
