//! Common infrastructure shared by the pinvault crates
//!
//! Currently this is the logging bootstrap plus helpers that keep
//! sensitive values (record titles, identifiers) out of log output.

pub mod logging;

pub use logging::LoggingTransformer;
