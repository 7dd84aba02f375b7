//! Entry point for the pinvault terminal application

use pinvault_common::LoggingTransformer;
use std::process::ExitCode;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    LoggingTransformer::init();

    pinvault::cli::run()
}
