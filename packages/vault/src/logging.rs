//! Security event logging for the vault session

use chrono::Utc;
use log::{error, info, warn};

/// Security-relevant events emitted by the session and breach pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    Setup,
    Login,
    Lockout,
    PinChange,
    Logout,
    ManualBackup,
    Restore,
    EmergencyArchive,
    Wipe,
}

impl SecurityEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityEvent::Setup => "VAULT_SETUP",
            SecurityEvent::Login => "VAULT_LOGIN",
            SecurityEvent::Lockout => "VAULT_LOCKOUT",
            SecurityEvent::PinChange => "PIN_CHANGE",
            SecurityEvent::Logout => "VAULT_LOGOUT",
            SecurityEvent::ManualBackup => "MANUAL_BACKUP",
            SecurityEvent::Restore => "BACKUP_RESTORE",
            SecurityEvent::EmergencyArchive => "EMERGENCY_ARCHIVE",
            SecurityEvent::Wipe => "VAULT_WIPE",
        }
    }
}

/// Logs a security-relevant event with standardized formatting
///
/// # Parameters
/// * `event` - What happened
/// * `details` - Additional details about the event; never a PIN
/// * `success` - Whether the operation was successful
///
/// Lockouts are always logged at error level regardless of outcome.
pub fn log_security_event(event: SecurityEvent, details: &str, success: bool) {
    let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let status = if success { "SUCCESS" } else { "FAILURE" };
    let event_type = event.as_str();

    match (event, success) {
        (SecurityEvent::Lockout, _) => {
            error!("[{timestamp}] {status} - {event_type}: {details}")
        }
        (_, true) => info!("[{timestamp}] {status} - {event_type}: {details}"),
        (_, false) => warn!("[{timestamp}] {status} - {event_type}: {details}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        let events = [
            SecurityEvent::Setup,
            SecurityEvent::Login,
            SecurityEvent::Lockout,
            SecurityEvent::PinChange,
            SecurityEvent::Logout,
            SecurityEvent::ManualBackup,
            SecurityEvent::Restore,
            SecurityEvent::EmergencyArchive,
            SecurityEvent::Wipe,
        ];
        let mut names: Vec<_> = events.iter().map(|e| e.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }
}
