//! Secret location resolution for emergency archives
//!
//! The secret location is a hidden directory, outside the vault data
//! directory, that receives emergency archives. Its path is chosen once per
//! installation and remembered by a [`LocationStore`]:
//! - OS credential store (Windows Credential Manager, macOS Keychain, ...)
//! - a pointer dotfile in the user's home directory
//!
//! The strategy is picked at composition time by [`LocationStoreBackend::for_platform`];
//! [`SecretLocationResolver`] only talks to the trait.

use crate::error::VaultResult;
use crate::security::{create_private_dir, mark_hidden};
use log::{debug, warn};
use std::path::{Path, PathBuf};

pub mod dotfile;
pub mod factory;
pub mod keychain;

pub use dotfile::DotfileLocationStore;
pub use factory::{LocationStoreBackend, create_resolver};
pub use keychain::KeychainLocationStore;

/// Durable key-value record of the secret location path
pub trait LocationStore {
    /// Previously persisted path, `None` on first run
    fn load(&self) -> VaultResult<Option<PathBuf>>;

    /// Remember `path` for future runs
    fn persist(&self, path: &Path) -> VaultResult<()>;
}

impl<S: LocationStore + ?Sized> LocationStore for &S {
    fn load(&self) -> VaultResult<Option<PathBuf>> {
        (**self).load()
    }

    fn persist(&self, path: &Path) -> VaultResult<()> {
        (**self).persist(path)
    }
}

/// Resolves the hidden directory used for emergency archives
///
/// Resolution never fails: store errors are logged and treated as
/// "nothing persisted", so the worst case is the fallback directory on
/// every run.
#[derive(Debug, Clone)]
pub struct SecretLocationResolver<S = LocationStoreBackend> {
    store: S,
    fallback_dir: PathBuf,
}

impl<S: LocationStore> SecretLocationResolver<S> {
    pub fn new(store: S, fallback_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            fallback_dir: fallback_dir.into(),
        }
    }

    pub fn fallback_dir(&self) -> &Path {
        &self.fallback_dir
    }

    /// Return the secret location, creating and persisting it if needed
    pub fn resolve(&self) -> PathBuf {
        match self.store.load() {
            Ok(Some(path)) if path.is_absolute() => {
                if !path.is_dir() {
                    debug!("Secret location missing on disk, recreating");
                    prepare_hidden_dir(&path);
                }
                return path;
            }
            Ok(Some(path)) => {
                warn!(
                    "Ignoring persisted secret location that is not absolute: {}",
                    path.display()
                );
            }
            Ok(None) => debug!("No secret location persisted yet"),
            Err(e) => warn!("Secret location store unavailable, using fallback: {e}"),
        }

        let path = self.fallback_dir.clone();
        prepare_hidden_dir(&path);

        if let Err(e) = self.store.persist(&path) {
            warn!("Failed to persist secret location: {e}");
        }

        path
    }
}

fn prepare_hidden_dir(path: &Path) {
    if let Err(e) = create_private_dir(path) {
        warn!("Failed to create secret location {}: {e}", path.display());
        return;
    }

    if let Err(e) = mark_hidden(path) {
        warn!("Failed to hide secret location {}: {e}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryStore {
        path: RefCell<Option<PathBuf>>,
        persist_calls: RefCell<u32>,
    }

    impl LocationStore for MemoryStore {
        fn load(&self) -> VaultResult<Option<PathBuf>> {
            Ok(self.path.borrow().clone())
        }

        fn persist(&self, path: &Path) -> VaultResult<()> {
            *self.persist_calls.borrow_mut() += 1;
            *self.path.borrow_mut() = Some(path.to_path_buf());
            Ok(())
        }
    }

    struct BrokenStore;

    impl LocationStore for BrokenStore {
        fn load(&self) -> VaultResult<Option<PathBuf>> {
            Err(VaultError::Configuration("store offline".to_string()))
        }

        fn persist(&self, _path: &Path) -> VaultResult<()> {
            Err(VaultError::Configuration("store offline".to_string()))
        }
    }

    #[test]
    fn test_first_run_creates_and_persists_fallback() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join(".vault_backup");
        let store = MemoryStore::default();
        let resolver = SecretLocationResolver::new(&store, &fallback);

        let resolved = resolver.resolve();

        assert_eq!(resolved, fallback);
        assert!(fallback.is_dir());
        assert_eq!(*store.path.borrow(), Some(fallback.clone()));
    }

    #[test]
    fn test_resolve_twice_returns_same_path() {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::default();
        let resolver = SecretLocationResolver::new(&store, dir.path().join(".vault_backup"));

        let first = resolver.resolve();
        let second = resolver.resolve();

        assert_eq!(first, second);
        assert_eq!(*store.persist_calls.borrow(), 1);
    }

    #[test]
    fn test_persisted_path_wins_over_fallback() {
        let dir = TempDir::new().unwrap();
        let persisted = dir.path().join("elsewhere");
        std::fs::create_dir_all(&persisted).unwrap();

        let store = MemoryStore::default();
        store.persist(&persisted).unwrap();
        let resolver = SecretLocationResolver::new(&store, dir.path().join(".vault_backup"));

        assert_eq!(resolver.resolve(), persisted);
        assert!(!dir.path().join(".vault_backup").exists());
    }

    #[test]
    fn test_missing_persisted_dir_is_recreated() {
        let dir = TempDir::new().unwrap();
        let persisted = dir.path().join("gone").join(".secret");

        let store = MemoryStore::default();
        store.persist(&persisted).unwrap();
        let resolver = SecretLocationResolver::new(&store, dir.path().join(".vault_backup"));

        assert_eq!(resolver.resolve(), persisted);
        assert!(persisted.is_dir());
    }

    #[test]
    fn test_store_errors_fall_back() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join(".vault_backup");
        let resolver = SecretLocationResolver::new(BrokenStore, &fallback);

        assert_eq!(resolver.resolve(), fallback);
        assert_eq!(resolver.resolve(), fallback);
        assert!(fallback.is_dir());
    }

    #[test]
    fn test_relative_persisted_path_is_ignored() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join(".vault_backup");
        let store = MemoryStore::default();
        *store.path.borrow_mut() = Some(PathBuf::from("relative/dir"));

        let resolver = SecretLocationResolver::new(&store, &fallback);

        assert_eq!(resolver.resolve(), fallback);
        assert_eq!(*store.path.borrow(), Some(fallback));
    }
}
