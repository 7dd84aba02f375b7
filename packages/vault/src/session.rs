//! Vault session: authentication state and record operations
//!
//! A session owns the lockout counter and the authenticated flag, so
//! several independent sessions can live in one process. After a breach the
//! session is terminated and refuses every further operation.

use crate::attachments::AttachmentStore;
use crate::backup::ManualBackups;
use crate::breach::{BreachReport, BreachResponder};
use crate::config::VaultConfig;
use crate::credential::CredentialStore;
use crate::error::{VaultError, VaultResult};
use crate::lockout::{AuthOutcome, LockoutPolicy};
use crate::logging::{SecurityEvent, log_security_event};
use crate::records::{RecordStore, VaultEntry, VaultRecords};
use crate::secret_location::{LocationStore, LocationStoreBackend, create_resolver};
use crate::security::{create_private_dir, validate_pin, validate_record};
use pinvault_common::LoggingTransformer;
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use subtle::ConstantTimeEq;

/// Confirmation collaborator (a dialog, a terminal prompt, a test stub)
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of submitting a PIN
#[derive(Debug)]
pub enum AuthResponse {
    Authenticated,
    Retry { remaining: u32 },
    /// Attempts exhausted: the vault was archived and wiped, the session is over
    LockedOut(BreachReport),
}

pub struct VaultSession<S = LocationStoreBackend> {
    config: VaultConfig,
    credentials: CredentialStore,
    store: RecordStore,
    attachments: AttachmentStore,
    backups: ManualBackups,
    responder: BreachResponder<S>,
    records: VaultRecords,
    active_pin: SecretString,
    lockout: LockoutPolicy,
    needs_setup: bool,
    authenticated: bool,
    terminated: bool,
}

impl VaultSession<LocationStoreBackend> {
    /// Open the vault described by `config` with the platform secret-location store
    pub fn open(config: VaultConfig) -> VaultResult<Self> {
        let responder = BreachResponder::new(
            create_resolver(&config),
            SecretString::from(config.archive_password.clone()),
        );
        Self::with_responder(config, responder)
    }
}

impl<S: LocationStore> VaultSession<S> {
    /// Open the vault with an explicit breach responder
    ///
    /// Creates the data and files directories, loads records (an unreadable
    /// data file is an empty vault) and loads the PIN, writing the default
    /// one on first run.
    pub fn with_responder(
        config: VaultConfig,
        responder: BreachResponder<S>,
    ) -> VaultResult<Self> {
        create_private_dir(&config.data_dir)?;

        let attachments = AttachmentStore::new(config.files_dir());
        attachments.ensure_dir()?;

        let credentials = CredentialStore::new(config.pin_file(), config.default_pin.clone());
        let needs_setup = !credentials.exists();
        let active_pin = credentials.load();

        let store = RecordStore::new(config.data_file());
        let records = store.load();

        Ok(Self {
            backups: ManualBackups::new(config.backups_dir()),
            lockout: LockoutPolicy::new(config.max_attempts),
            config,
            credentials,
            store,
            attachments,
            responder,
            records,
            active_pin,
            needs_setup,
            authenticated: false,
            terminated: false,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Whether the PIN file was absent when the session opened
    pub fn needs_setup(&self) -> bool {
        self.needs_setup
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn failed_attempts(&self) -> u32 {
        self.lockout.attempt_count()
    }

    /// Choose the initial PIN on first run
    pub fn complete_setup(&mut self, pin: &str) -> VaultResult<()> {
        self.ensure_open()?;
        if !self.needs_setup {
            return Err(VaultError::InvalidInput(
                "Vault is already set up; use change PIN instead".to_string(),
            ));
        }

        validate_pin(pin)?;
        self.credentials.save(pin)?;
        self.active_pin = SecretString::from(pin.to_string());
        self.needs_setup = false;

        log_security_event(SecurityEvent::Setup, "initial PIN chosen", true);
        Ok(())
    }

    /// Submit a PIN
    ///
    /// Wrong PINs are not errors: they come back as `Retry` until the
    /// attempts run out, at which point the breach response runs and the
    /// session terminates.
    pub fn authenticate(&mut self, entered: &str) -> VaultResult<AuthResponse> {
        self.ensure_open()?;

        match self.lockout.check(entered, self.active_pin.expose_secret()) {
            AuthOutcome::Success => {
                self.authenticated = true;
                self.lockout.reset();
                LoggingTransformer::log_auth_event("pin login", None, true);
                log_security_event(SecurityEvent::Login, "PIN accepted", true);
                Ok(AuthResponse::Authenticated)
            }
            AuthOutcome::Retry { remaining } => {
                LoggingTransformer::log_auth_event("pin login", Some(remaining), false);
                Ok(AuthResponse::Retry { remaining })
            }
            AuthOutcome::Breach => Ok(AuthResponse::LockedOut(self.breach())),
        }
    }

    fn breach(&mut self) -> BreachReport {
        log_security_event(
            SecurityEvent::Lockout,
            &format!("{} failed PIN attempts", self.lockout.max_attempts()),
            false,
        );

        let report = self
            .responder
            .respond(&self.config.data_file(), &self.config.files_dir());

        self.records.clear();
        self.authenticated = false;
        self.terminated = true;
        report
    }

    /// Replace the PIN
    ///
    /// `current` must match the active PIN and `proposed` must be exactly
    /// four digits. The in-memory PIN only changes once the file is written.
    pub fn change_pin(&mut self, current: &str, proposed: &str) -> VaultResult<()> {
        self.ensure_authenticated()?;

        let active = self.active_pin.expose_secret();
        let matches = current.len() == active.len()
            && bool::from(current.as_bytes().ct_eq(active.as_bytes()));
        if !matches {
            log_security_event(SecurityEvent::PinChange, "current PIN mismatch", false);
            return Err(VaultError::IncorrectPin);
        }

        if let Err(e) = validate_pin(proposed) {
            log_security_event(SecurityEvent::PinChange, "proposed PIN rejected", false);
            return Err(e);
        }

        self.credentials.save(proposed)?;
        self.active_pin = SecretString::from(proposed.to_string());

        log_security_event(SecurityEvent::PinChange, "PIN updated", true);
        Ok(())
    }

    /// Log out after the user confirms; returns whether the session logged out
    pub fn logout(&mut self, confirm: &dyn Confirm) -> bool {
        if self.terminated || !self.authenticated {
            return false;
        }

        if !confirm.confirm("Are you sure you want to log out?") {
            return false;
        }

        self.authenticated = false;
        self.lockout.reset();
        log_security_event(SecurityEvent::Logout, "session closed by user", true);
        true
    }

    /// Insert or replace a record
    ///
    /// With an attachment the file is copied into the vault and replaces any
    /// previous attachment of the record; without one the previous
    /// attachment is kept.
    pub fn upsert(
        &mut self,
        title: &str,
        content: &str,
        attachment: Option<&Path>,
    ) -> VaultResult<()> {
        self.ensure_authenticated()?;
        let (title, content) = validate_record(title, content)?;

        let previous_file = self
            .records
            .get(&title)
            .and_then(|entry| entry.file_name.clone());
        let new_file = attachment
            .map(|source| self.attachments.import(source))
            .transpose()?;

        let entry = VaultEntry {
            content,
            file_name: new_file.clone().or_else(|| previous_file.clone()),
        };
        let previous = self.records.insert(title.clone(), entry);

        if let Err(e) = self.store.save(&self.records) {
            match previous {
                Some(entry) => self.records.insert(title.clone(), entry),
                None => self.records.remove(&title),
            };
            if let Some(name) = &new_file {
                self.discard_attachment(name);
            }
            LoggingTransformer::log_vault_operation("upsert", &title, false);
            return Err(e);
        }

        if let (Some(_), Some(old)) = (&new_file, &previous_file) {
            self.discard_attachment(old);
        }

        LoggingTransformer::log_vault_operation("upsert", &title, true);
        Ok(())
    }

    /// Delete a record and its attachment file
    pub fn delete(&mut self, title: &str) -> VaultResult<VaultEntry> {
        self.ensure_authenticated()?;

        let entry = self
            .records
            .remove(title)
            .ok_or_else(|| VaultError::ItemNotFound(title.to_string()))?;

        if let Err(e) = self.store.save(&self.records) {
            self.records.insert(title.to_string(), entry);
            LoggingTransformer::log_vault_operation("delete", title, false);
            return Err(e);
        }

        if let Some(name) = &entry.file_name {
            self.discard_attachment(name);
        }

        LoggingTransformer::log_vault_operation("delete", title, true);
        Ok(entry)
    }

    pub fn get(&self, title: &str) -> VaultResult<&VaultEntry> {
        self.ensure_authenticated()?;
        self.records
            .get(title)
            .ok_or_else(|| VaultError::ItemNotFound(title.to_string()))
    }

    /// Titles in display order
    pub fn list(&self) -> VaultResult<Vec<&str>> {
        self.ensure_authenticated()?;
        Ok(self.records.keys().map(String::as_str).collect())
    }

    /// Location of a record's attachment, if it has one
    pub fn attachment_path(&self, title: &str) -> VaultResult<Option<PathBuf>> {
        let entry = self.get(title)?;
        entry
            .file_name
            .as_deref()
            .map(|name| self.attachments.path_of(name))
            .transpose()
    }

    /// Write a plain `backup_<timestamp>.json` copy of the data file
    pub fn backup(&self) -> VaultResult<PathBuf> {
        self.ensure_authenticated()?;

        if !self.store.path().exists() {
            self.store.save(&self.records)?;
        }

        let result = self.backups.create(self.store.path());
        log_security_event(SecurityEvent::ManualBackup, "plain backup", result.is_ok());
        result
    }

    pub fn list_backups(&self) -> VaultResult<Vec<PathBuf>> {
        self.ensure_authenticated()?;
        self.backups.list()
    }

    /// Replace the whole vault with the contents of `backup_file`
    ///
    /// Returns the number of restored records. Nothing changes if the file
    /// cannot be read or parsed.
    pub fn restore(&mut self, backup_file: &Path) -> VaultResult<usize> {
        self.ensure_authenticated()?;

        let records = match RecordStore::read_from(backup_file) {
            Ok(records) => records,
            Err(e) => {
                log_security_event(SecurityEvent::Restore, "backup unreadable", false);
                return Err(e);
            }
        };

        self.store.save(&records)?;
        self.records = records;

        log_security_event(
            SecurityEvent::Restore,
            &format!("{} records restored", self.records.len()),
            true,
        );
        Ok(self.records.len())
    }

    fn discard_attachment(&self, name: &str) {
        if let Err(e) = self.attachments.remove(name) {
            LoggingTransformer::log_cleanup_warning("attachment file", &e);
        }
    }

    fn ensure_open(&self) -> VaultResult<()> {
        if self.terminated {
            return Err(VaultError::SessionTerminated);
        }
        Ok(())
    }

    fn ensure_authenticated(&self) -> VaultResult<()> {
        self.ensure_open()?;
        if !self.authenticated {
            return Err(VaultError::NotAuthenticated);
        }
        Ok(())
    }
}
