//! Interactive terminal front end
//!
//! The lockout counter lives in the session, so the whole lifecycle (setup,
//! login, menu) runs inside one process instead of one-shot subcommands.

mod menu;
mod prompts;

use crate::breach::{BreachReport, StepOutcome};
use crate::config::VaultConfig;
use crate::session::VaultSession;
use clap::Parser;
use pinvault_common::LoggingTransformer;
use std::path::PathBuf;
use std::process::ExitCode;

pub use menu::MenuExit;
pub use prompts::LoginResult;

/// Exit status after the vault was locked out and wiped
const LOCKOUT_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(name = "pinvault")]
#[command(about = "PIN-protected personal note vault")]
pub struct Cli {
    /// Directory holding vault data (default: platform data dir)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

impl Cli {
    /// Vault configuration for this invocation, with `~` and env vars expanded
    pub fn config(&self) -> VaultConfig {
        let mut config = match &self.data_dir {
            Some(dir) => VaultConfig::at(dir),
            None => VaultConfig::default(),
        };

        if let Ok(expanded) = shellexpand::full(&config.data_dir.to_string_lossy()) {
            config.data_dir = PathBuf::from(expanded.to_string());
        }
        config
    }
}

pub fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.config();
    log::debug!("Opening vault in {}", config.data_dir.display());

    let mut session = VaultSession::open(config)?;

    if session.needs_setup() {
        prompts::first_run_setup(&mut session)?;
    }

    loop {
        match prompts::login(&mut session)? {
            LoginResult::Authenticated => {}
            LoginResult::LockedOut(report) => {
                print_breach_report(&report);
                return Ok(ExitCode::from(LOCKOUT_EXIT_CODE));
            }
        }

        match menu::run(&mut session)? {
            MenuExit::LoggedOut => continue,
            MenuExit::Quit => {
                LoggingTransformer::log_auth_event("session end", None, true);
                return Ok(ExitCode::SUCCESS);
            }
        }
    }
}

fn print_breach_report(report: &BreachReport) {
    eprintln!("Too many failed attempts. The vault has been locked and wiped.");

    match &report.archive {
        StepOutcome::Done(_) => eprintln!("An encrypted emergency backup was written."),
        _ => eprintln!("No emergency backup could be written."),
    }
    if !report.wipe_succeeded() {
        eprintln!("Warning: some vault data could not be removed.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_flag() {
        let cli = Cli::try_parse_from(["pinvault", "--data-dir", "/tmp/vault"]).unwrap();
        assert_eq!(cli.config().data_dir, PathBuf::from("/tmp/vault"));
    }

    #[test]
    fn test_default_data_dir() {
        let cli = Cli::try_parse_from(["pinvault"]).unwrap();
        assert_eq!(cli.config().data_dir, VaultConfig::default().data_dir);
    }

    #[test]
    fn test_unknown_flags_rejected() {
        assert!(Cli::try_parse_from(["pinvault", "--pin", "1234"]).is_err());
    }
}
