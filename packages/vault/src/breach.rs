//! Breach response: archive to the secret location, then wipe
//!
//! Runs as an ordered pipeline. Every step records its own outcome and no
//! step can stop a later one: losing the emergency archive is acceptable,
//! skipping the wipe is not.

use crate::archive::write_emergency_archive;
use crate::logging::{SecurityEvent, log_security_event};
use crate::records::RecordStore;
use crate::secret_location::{LocationStore, LocationStoreBackend, SecretLocationResolver};
use pinvault_common::LoggingTransformer;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};

const PIPELINE: &str = "Breach response";

/// Outcome of one breach pipeline step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Done(T),
    /// Nothing to do (e.g. the directory was already absent)
    NotNeeded,
    Failed(String),
}

impl<T> StepOutcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, StepOutcome::Done(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

/// How the data file was emptied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeMethod {
    /// Overwritten with an empty record set
    Emptied,
    /// Overwrite failed, file deleted instead
    Deleted,
}

/// Per-step results of a breach response
#[derive(Debug, Clone)]
pub struct BreachReport {
    pub secret_location: PathBuf,
    pub archive: StepOutcome<PathBuf>,
    pub store_wipe: StepOutcome<WipeMethod>,
    pub files_removal: StepOutcome<()>,
}

impl BreachReport {
    /// Whether the emergency archive was written (informational only)
    pub fn backup_succeeded(&self) -> bool {
        self.archive.is_done()
    }

    pub fn archive_path(&self) -> Option<&Path> {
        match &self.archive {
            StepOutcome::Done(path) => Some(path),
            _ => None,
        }
    }

    /// Whether both the data store and the files directory are gone
    pub fn wipe_succeeded(&self) -> bool {
        self.store_wipe.is_done() && !self.files_removal.is_failed()
    }
}

pub struct BreachResponder<S = LocationStoreBackend> {
    resolver: SecretLocationResolver<S>,
    archive_password: SecretString,
}

impl<S: LocationStore> BreachResponder<S> {
    pub fn new(resolver: SecretLocationResolver<S>, archive_password: SecretString) -> Self {
        Self {
            resolver,
            archive_password,
        }
    }

    pub fn resolver(&self) -> &SecretLocationResolver<S> {
        &self.resolver
    }

    /// Archive then irreversibly wipe the vault
    pub fn respond(&self, data_file: &Path, files_dir: &Path) -> BreachReport {
        let secret_location = self.resolver.resolve();
        let archive = self.archive_step(&secret_location, data_file, files_dir);
        let store_wipe = wipe_store(data_file);
        let files_removal = remove_files_dir(files_dir);

        let report = BreachReport {
            secret_location,
            archive,
            store_wipe,
            files_removal,
        };

        log_security_event(
            SecurityEvent::Wipe,
            &format!(
                "data store: {:?}, files directory: {:?}",
                report.store_wipe, report.files_removal
            ),
            report.wipe_succeeded(),
        );

        report
    }

    fn archive_step(
        &self,
        secret_location: &Path,
        data_file: &Path,
        files_dir: &Path,
    ) -> StepOutcome<PathBuf> {
        match write_emergency_archive(
            secret_location,
            data_file,
            files_dir,
            self.archive_password.expose_secret(),
        ) {
            Ok(path) => {
                log_security_event(SecurityEvent::EmergencyArchive, "archive written", true);
                StepOutcome::Done(path)
            }
            Err(e) => {
                LoggingTransformer::log_pipeline_failure(PIPELINE, "emergency archive", &e);
                log_security_event(SecurityEvent::EmergencyArchive, "archive not written", false);
                StepOutcome::Failed(e.to_string())
            }
        }
    }
}

fn wipe_store(data_file: &Path) -> StepOutcome<WipeMethod> {
    let overwrite = match RecordStore::new(data_file).wipe() {
        Ok(()) => return StepOutcome::Done(WipeMethod::Emptied),
        Err(e) => e,
    };
    LoggingTransformer::log_pipeline_failure(PIPELINE, "empty data store", &overwrite);

    match std::fs::remove_file(data_file) {
        Ok(()) => StepOutcome::Done(WipeMethod::Deleted),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StepOutcome::Done(WipeMethod::Deleted),
        Err(e) => {
            LoggingTransformer::log_pipeline_failure(PIPELINE, "delete data store", &e);
            StepOutcome::Failed(format!("{overwrite}; delete failed: {e}"))
        }
    }
}

fn remove_files_dir(files_dir: &Path) -> StepOutcome<()> {
    if !files_dir.exists() {
        return StepOutcome::NotNeeded;
    }

    match std::fs::remove_dir_all(files_dir) {
        Ok(()) => StepOutcome::Done(()),
        Err(e) => {
            LoggingTransformer::log_pipeline_failure(PIPELINE, "remove files directory", &e);
            StepOutcome::Failed(e.to_string())
        }
    }
}
