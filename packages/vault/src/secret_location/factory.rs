//! Factory for choosing the secret location store

use super::{DotfileLocationStore, KeychainLocationStore, LocationStore, SecretLocationResolver};
use crate::config::VaultConfig;
use crate::error::VaultResult;
use log::warn;
use std::path::{Path, PathBuf};

/// Enum to hold the available secret location stores
#[derive(Debug)]
pub enum LocationStoreBackend {
    Keychain(KeychainLocationStore),
    Dotfile(DotfileLocationStore),
}

impl LocationStoreBackend {
    /// Pick the store for the current target
    ///
    /// Windows keeps the path in the credential store, every other target
    /// in a pointer dotfile. If the credential store cannot be opened the
    /// dotfile is used instead.
    pub fn for_platform(config: &VaultConfig) -> Self {
        if cfg!(windows) {
            match KeychainLocationStore::new(config.keychain_service.clone()) {
                Ok(store) => return LocationStoreBackend::Keychain(store),
                Err(e) => warn!("Credential store unavailable, using pointer file: {e}"),
            }
        }

        LocationStoreBackend::Dotfile(DotfileLocationStore::new(config.location_pointer()))
    }
}

impl LocationStore for LocationStoreBackend {
    fn load(&self) -> VaultResult<Option<PathBuf>> {
        match self {
            LocationStoreBackend::Keychain(store) => store.load(),
            LocationStoreBackend::Dotfile(store) => store.load(),
        }
    }

    fn persist(&self, path: &Path) -> VaultResult<()> {
        match self {
            LocationStoreBackend::Keychain(store) => store.persist(path),
            LocationStoreBackend::Dotfile(store) => store.persist(path),
        }
    }
}

/// Resolver wired with the platform store and the configured fallback directory
pub fn create_resolver(config: &VaultConfig) -> SecretLocationResolver<LocationStoreBackend> {
    SecretLocationResolver::new(
        LocationStoreBackend::for_platform(config),
        config.secret_fallback_dir(),
    )
}
