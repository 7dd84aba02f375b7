//! PIN-protected personal note vault
//!
//! Records live in a JSON data file next to a directory of attachment
//! copies. Access is gated by a 4-digit PIN; exhausting the allowed attempts
//! writes an encrypted emergency archive to a hidden location and wipes the
//! vault.

pub mod archive;
pub mod attachments;
pub mod backup;
pub mod breach;
pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod lockout;
pub mod logging;
pub mod records;
pub mod secret_location;
pub mod security;
pub mod session;

pub use breach::{BreachReport, BreachResponder, StepOutcome, WipeMethod};
pub use config::VaultConfig;
pub use credential::CredentialStore;
pub use error::{VaultError, VaultResult};
pub use lockout::{AuthOutcome, LockState, LockoutPolicy, MAX_ATTEMPTS};
pub use records::{RecordStore, VaultEntry, VaultRecords};
pub use secret_location::{
    DotfileLocationStore, KeychainLocationStore, LocationStore, LocationStoreBackend,
    SecretLocationResolver, create_resolver,
};
pub use session::{AuthResponse, Confirm, VaultSession};
