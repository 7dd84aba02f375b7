//! Input validation for user-supplied values
//!
//! PIN format, record titles and content, and attachment names.

use crate::error::{VaultError, VaultResult};

/// Number of digits a PIN must have
pub const PIN_LENGTH: usize = 4;

/// Validate a proposed PIN: exactly four ASCII digits
pub fn validate_pin(pin: &str) -> VaultResult<()> {
    if pin.chars().count() != PIN_LENGTH {
        return Err(VaultError::InvalidPin(format!(
            "PIN must be exactly {PIN_LENGTH} digits"
        )));
    }

    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(VaultError::InvalidPin(
            "PIN must contain digits only".to_string(),
        ));
    }

    Ok(())
}

/// Validate and normalize a record title and its content
///
/// Both are trimmed; either being empty afterwards is rejected.
pub fn validate_record(title: &str, content: &str) -> VaultResult<(String, String)> {
    let title = title.trim();
    let content = content.trim();

    if title.is_empty() || content.is_empty() {
        return Err(VaultError::InvalidInput(
            "Title and content cannot be empty".to_string(),
        ));
    }

    Ok((title.to_string(), content.to_string()))
}

/// Validate an attachment file name stored in a record
///
/// The name must be a single path component so it always resolves inside
/// the files directory.
pub fn validate_attachment_name(name: &str) -> VaultResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(VaultError::InvalidInput(format!(
            "Invalid attachment name: {name:?}"
        )));
    }

    if name.contains(['/', '\\', '\0']) {
        return Err(VaultError::InvalidInput(format!(
            "Attachment name contains unsafe characters: {name:?}"
        )));
    }

    Ok(())
}
