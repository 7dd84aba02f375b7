use log::warn;
use std::path::{Path, PathBuf};

pub const DATA_FILE_NAME: &str = "vault_data.json";
pub const PIN_FILE_NAME: &str = "pin.json";
pub const FILES_DIR_NAME: &str = "vault_files";
pub const BACKUPS_DIR_NAME: &str = "backups";

#[derive(Clone, Debug)]
pub struct VaultConfig {
    /// Root directory holding the data file, PIN file, attachments and backups
    pub data_dir: PathBuf,
    pub max_attempts: u32,
    pub default_pin: String,
    /// Password protecting emergency archives
    pub archive_password: String,
    /// Keychain service name for the secret-location entry
    pub keychain_service: String,
    /// Overrides the platform fallback directory for emergency archives
    pub secret_fallback_dir: Option<PathBuf>,
    /// Overrides the dotfile that remembers the secret location
    pub location_pointer: Option<PathBuf>,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_pin() -> String {
    "1234".to_string()
}

fn default_archive_password() -> String {
    "pinvault-emergency".to_string()
}

fn default_keychain_service() -> String {
    "pinvault".to_string()
}

impl VaultConfig {
    /// Config rooted at `data_dir` with every other setting defaulted
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            max_attempts: default_max_attempts(),
            default_pin: default_pin(),
            archive_password: default_archive_password(),
            keychain_service: default_keychain_service(),
            secret_fallback_dir: None,
            location_pointer: None,
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir.join(DATA_FILE_NAME)
    }

    pub fn pin_file(&self) -> PathBuf {
        self.data_dir.join(PIN_FILE_NAME)
    }

    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join(FILES_DIR_NAME)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir.join(BACKUPS_DIR_NAME)
    }

    /// Directory used for emergency archives when nothing has been persisted yet
    pub fn secret_fallback_dir(&self) -> PathBuf {
        if let Some(dir) = &self.secret_fallback_dir {
            return dir.clone();
        }
        platform_fallback_dir(dirs::home_dir().as_deref(), &self.data_dir)
    }

    /// Dotfile recording the chosen secret location
    pub fn location_pointer(&self) -> PathBuf {
        if let Some(path) = &self.location_pointer {
            return path.clone();
        }
        match dirs::home_dir() {
            Some(home) => home.join(".pinvault_location"),
            None => self.data_dir.join(".pinvault_location"),
        }
    }
}

fn platform_fallback_dir(home: Option<&Path>, data_dir: &Path) -> PathBuf {
    let base = match home {
        Some(home) if cfg!(windows) => home.join("Documents"),
        Some(home) => home.to_path_buf(),
        None => {
            warn!("Could not determine home directory, keeping emergency archives next to the vault");
            data_dir.to_path_buf()
        }
    };
    base.join(".vault_backup")
}

impl Default for VaultConfig {
    fn default() -> Self {
        let data_dir = match dirs::data_dir() {
            Some(mut dir) => {
                dir.push("pinvault");
                dir
            }
            None => {
                warn!("Could not determine OS data directory, using ./pinvault");
                PathBuf::from("./pinvault")
            }
        };

        Self::at(data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths_live_under_data_dir() {
        let config = VaultConfig::at("/tmp/vault-root");
        assert_eq!(config.data_file(), PathBuf::from("/tmp/vault-root/vault_data.json"));
        assert_eq!(config.pin_file(), PathBuf::from("/tmp/vault-root/pin.json"));
        assert_eq!(config.files_dir(), PathBuf::from("/tmp/vault-root/vault_files"));
        assert_eq!(config.backups_dir(), PathBuf::from("/tmp/vault-root/backups"));
    }

    #[test]
    fn test_defaults() {
        let config = VaultConfig::at("root");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.default_pin, "1234");
        assert!(!config.archive_password.is_empty());
    }

    #[test]
    fn test_fallback_dir_is_hidden_folder() {
        let dir = platform_fallback_dir(Some(Path::new("/home/user")), Path::new("/data"));
        assert_eq!(dir.file_name().and_then(|n| n.to_str()), Some(".vault_backup"));

        let without_home = platform_fallback_dir(None, Path::new("/data"));
        assert_eq!(without_home, PathBuf::from("/data/.vault_backup"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = VaultConfig::at("root");
        config.secret_fallback_dir = Some(PathBuf::from("/secret"));
        config.location_pointer = Some(PathBuf::from("/pointer.json"));
        assert_eq!(config.secret_fallback_dir(), PathBuf::from("/secret"));
        assert_eq!(config.location_pointer(), PathBuf::from("/pointer.json"));
    }
}
