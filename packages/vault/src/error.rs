#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Keychain error: {0}")]
    Keychain(#[from] keyring::Error),
    #[error("Invalid PIN: {0}")]
    InvalidPin(String),
    #[error("Incorrect PIN")]
    IncorrectPin,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Session terminated after security lockout")]
    SessionTerminated,
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl VaultError {
    /// Whether the error was caused by user input rather than the environment
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            VaultError::InvalidPin(_) | VaultError::InvalidInput(_) | VaultError::IncorrectPin
        )
    }
}

impl From<walkdir::Error> for VaultError {
    fn from(err: walkdir::Error) -> Self {
        VaultError::Io(err.into())
    }
}

pub type VaultResult<T> = Result<T, VaultError>;
