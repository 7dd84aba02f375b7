//! First-run setup and PIN login prompts

use crate::breach::BreachReport;
use crate::error::VaultError;
use crate::secret_location::LocationStore;
use crate::session::{AuthResponse, VaultSession};
use dialoguer::{Password, theme::ColorfulTheme};
use zeroize::Zeroizing;

pub enum LoginResult {
    Authenticated,
    LockedOut(BreachReport),
}

/// Ask for the initial PIN until a valid, confirmed one is given
pub fn first_run_setup<S: LocationStore>(
    session: &mut VaultSession<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Welcome! Choose a 4-digit PIN to protect your vault.");
    println!(
        "After {} wrong attempts the vault is backed up to a hidden location and wiped.",
        session.config().max_attempts
    );
    println!();

    loop {
        let pin = Zeroizing::new(
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt("New PIN")
                .with_confirmation("Confirm PIN", "PINs do not match")
                .interact()?,
        );

        match session.complete_setup(&pin) {
            Ok(()) => {
                println!("PIN saved.");
                return Ok(());
            }
            Err(e @ VaultError::InvalidPin(_)) => eprintln!("{e}"),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Prompt for the PIN until it is accepted or the attempts run out
pub fn login<S: LocationStore>(
    session: &mut VaultSession<S>,
) -> Result<LoginResult, Box<dyn std::error::Error>> {
    loop {
        let pin = Zeroizing::new(
            Password::with_theme(&ColorfulTheme::default())
                .with_prompt("PIN")
                .allow_empty_password(true)
                .interact()?,
        );

        match session.authenticate(&pin)? {
            AuthResponse::Authenticated => return Ok(LoginResult::Authenticated),
            AuthResponse::Retry { remaining } => {
                eprintln!("Incorrect PIN. {remaining} attempt(s) left.");
            }
            AuthResponse::LockedOut(report) => return Ok(LoginResult::LockedOut(report)),
        }
    }
}
