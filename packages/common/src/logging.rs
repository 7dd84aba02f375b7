//! Structured logging infrastructure
//!
//! Provides env_logger-based logging with secure handling of sensitive data
//! and proper integration with the standard log crate.

use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=info` - Enable info and above
    /// - `RUST_LOG=pinvault=debug` - Module-specific levels
    ///
    /// Defaults to `warn` so the interactive shell stays quiet.
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .format_timestamp_micros()
                .init();

            debug!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Use this in test modules to avoid initialization conflicts
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Log vault record operations without exposing the record title
    pub fn log_vault_operation(operation: &str, title: &str, success: bool) {
        let title_hash = Self::secure_hash_key(title);
        if success {
            info!("Vault operation succeeded: {operation} (title_hash: {title_hash})");
        } else {
            warn!("Vault operation failed: {operation} (title_hash: {title_hash})");
        }
    }

    /// Log authentication events
    ///
    /// Only the outcome and remaining budget are recorded, never the PIN.
    pub fn log_auth_event(event: &str, remaining_attempts: Option<u32>, success: bool) {
        match (success, remaining_attempts) {
            (true, _) => info!("Authentication succeeded: {event}"),
            (false, Some(remaining)) => {
                warn!("Authentication failed: {event} (remaining_attempts: {remaining})")
            }
            (false, None) => warn!("Authentication failed: {event}"),
        }
    }

    /// Log cleanup failures with error context
    pub fn log_cleanup_warning(component: &str, error: &dyn std::error::Error) {
        warn!("Component cleanup failed: {component} ({error})");
    }

    /// Log a step of a must-complete pipeline that did not succeed
    pub fn log_pipeline_failure(pipeline: &str, step: &str, error: &dyn std::error::Error) {
        error!("{pipeline}: step '{step}' failed: {error}");
    }

    /// SHA-256 based hashing for log output
    ///
    /// Returns the first 12 hex characters of the digest, prefixed with `#`.
    pub fn secure_hash_key(key: &str) -> String {
        let hash = Sha256::digest(key.as_bytes());
        let hex_hash = format!("{hash:x}");
        format!("#{}", &hex_hash[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_hash_is_stable_and_short() {
        let first = LoggingTransformer::secure_hash_key("Bank notes");
        let second = LoggingTransformer::secure_hash_key("Bank notes");
        assert_eq!(first, second);
        assert_eq!(first.len(), 13);
        assert!(first.starts_with('#'));
        assert!(!first.contains("Bank"));
    }

    #[test]
    fn test_secure_hash_differs_per_input() {
        assert_ne!(
            LoggingTransformer::secure_hash_key("a"),
            LoggingTransformer::secure_hash_key("b")
        );
    }
}
