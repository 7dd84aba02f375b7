//! User-initiated plain backups of the data file
//!
//! Backups are unencrypted copies named `backup_<YYYYMMDD_HHMMSS>.json`.
//! Restoring replaces the whole vault; there is no merge.

use crate::error::{VaultError, VaultResult};
use crate::security::create_private_dir;
use chrono::Local;
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "backup_";
const BACKUP_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct ManualBackups {
    dir: PathBuf,
}

impl ManualBackups {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `data_file` into the backups directory
    pub fn create(&self, data_file: &Path) -> VaultResult<PathBuf> {
        if !data_file.is_file() {
            return Err(VaultError::ItemNotFound(format!(
                "No vault data to back up at {}",
                data_file.display()
            )));
        }

        create_private_dir(&self.dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut target = self.dir.join(format!("{BACKUP_PREFIX}{stamp}.{BACKUP_EXTENSION}"));
        let mut counter = 1;
        while target.exists() {
            target = self
                .dir
                .join(format!("{BACKUP_PREFIX}{stamp}_{counter}.{BACKUP_EXTENSION}"));
            counter += 1;
        }

        std::fs::copy(data_file, &target)?;
        Ok(target)
    }

    /// Existing backups, oldest first
    pub fn list(&self) -> VaultResult<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if is_backup_file(&path) {
                backups.push(path);
            }
        }
        backups.sort();
        Ok(backups)
    }
}

fn is_backup_file(path: &Path) -> bool {
    let named_like_backup = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(BACKUP_PREFIX));
    let json = path
        .extension()
        .is_some_and(|ext| ext == BACKUP_EXTENSION);

    named_like_backup && json && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_copies_data_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("vault_data.json");
        std::fs::write(&data, br#"{"a": {"content": "b", "file_name": null}}"#).unwrap();
        let backups = ManualBackups::new(dir.path().join("backups"));

        let created = backups.create(&data).unwrap();

        let name = created.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("backup_"));
        assert!(name.ends_with(".json"));
        assert_eq!(std::fs::read(&created).unwrap(), std::fs::read(&data).unwrap());
    }

    #[test]
    fn test_create_without_data_fails() {
        let dir = TempDir::new().unwrap();
        let backups = ManualBackups::new(dir.path().join("backups"));
        assert!(backups.create(&dir.path().join("vault_data.json")).is_err());
    }

    #[test]
    fn test_list_only_returns_backups_sorted() {
        let dir = TempDir::new().unwrap();
        let backup_dir = dir.path().join("backups");
        std::fs::create_dir_all(&backup_dir).unwrap();
        std::fs::write(backup_dir.join("backup_20240102_000000.json"), b"{}").unwrap();
        std::fs::write(backup_dir.join("backup_20230101_000000.json"), b"{}").unwrap();
        std::fs::write(backup_dir.join("notes.txt"), b"").unwrap();
        std::fs::write(backup_dir.join("backup_20240101.txt"), b"").unwrap();

        let listed = ManualBackups::new(&backup_dir).list().unwrap();

        let names: Vec<_> = listed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            ["backup_20230101_000000.json", "backup_20240102_000000.json"]
        );
    }

    #[test]
    fn test_list_without_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(ManualBackups::new(dir.path().join("none")).list().unwrap().is_empty());
    }

    #[test]
    fn test_repeated_backups_do_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("vault_data.json");
        std::fs::write(&data, b"{}").unwrap();
        let backups = ManualBackups::new(dir.path().join("backups"));

        let first = backups.create(&data).unwrap();
        let second = backups.create(&data).unwrap();

        assert_ne!(first, second);
        assert_eq!(backups.list().unwrap().len(), 2);
    }
}
