//! Attachment files copied into the vault

use crate::error::{VaultError, VaultResult};
use crate::security::{create_private_dir, validate_attachment_name};
use chrono::Local;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> VaultResult<()> {
        create_private_dir(&self.dir)?;
        Ok(())
    }

    /// Copy `source` into the files directory
    ///
    /// The stored name is `<YYYYMMDD_HHMMSS>_<original name>`; a counter is
    /// inserted when two imports land in the same second.
    pub fn import(&self, source: &Path) -> VaultResult<String> {
        let original = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                VaultError::InvalidInput(format!("Not a file name: {}", source.display()))
            })?;

        if !source.is_file() {
            return Err(VaultError::ItemNotFound(source.display().to_string()));
        }

        self.ensure_dir()?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut stored = format!("{stamp}_{original}");
        let mut counter = 1;
        while self.dir.join(&stored).exists() {
            stored = format!("{stamp}_{counter}_{original}");
            counter += 1;
        }

        std::fs::copy(source, self.dir.join(&stored))?;
        log::debug!("Imported attachment into {}", self.dir.display());
        Ok(stored)
    }

    /// Full path of a stored attachment
    pub fn path_of(&self, name: &str) -> VaultResult<PathBuf> {
        validate_attachment_name(name)?;
        Ok(self.dir.join(name))
    }

    /// Remove a stored attachment; a file that is already gone is not an error
    pub fn remove(&self, name: &str) -> VaultResult<()> {
        let path = self.path_of(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
