//! Main vault menu shown after login

use crate::error::VaultError;
use crate::secret_location::LocationStore;
use crate::session::{Confirm, VaultSession};
use dialoguer::{Confirm as ConfirmPrompt, Input, Password, Select, theme::ColorfulTheme};
use std::path::PathBuf;
use zeroize::Zeroizing;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

pub enum MenuExit {
    LoggedOut,
    Quit,
}

#[derive(Clone, Copy)]
enum Action {
    List,
    View,
    Save,
    Delete,
    ChangePin,
    Backup,
    Restore,
    Logout,
    Quit,
}

const ACTIONS: [(Action, &str); 9] = [
    (Action::List, "List records"),
    (Action::View, "View record"),
    (Action::Save, "Add or update record"),
    (Action::Delete, "Delete record"),
    (Action::ChangePin, "Change PIN"),
    (Action::Backup, "Back up vault"),
    (Action::Restore, "Restore from backup"),
    (Action::Logout, "Log out"),
    (Action::Quit, "Quit"),
];

pub fn run<S: LocationStore>(session: &mut VaultSession<S>) -> CliResult<MenuExit> {
    let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();

    loop {
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Vault")
            .items(&labels)
            .default(0)
            .interact()?;

        let outcome = match ACTIONS[choice].0 {
            Action::List => list(session),
            Action::View => view(session),
            Action::Save => save(session),
            Action::Delete => delete(session),
            Action::ChangePin => change_pin(session),
            Action::Backup => backup(session),
            Action::Restore => restore(session),
            Action::Logout => {
                let confirmed = |prompt: &str| ask(prompt).unwrap_or(false);
                if session.logout(&confirmed) {
                    println!("Logged out.");
                    return Ok(MenuExit::LoggedOut);
                }
                Ok(())
            }
            Action::Quit => {
                if quit_confirmed(&|prompt: &str| ask(prompt).unwrap_or(false)) {
                    return Ok(MenuExit::Quit);
                }
                Ok(())
            }
        };

        if let Err(e) = outcome {
            report(e)?;
        }
    }
}

/// Vault errors are shown and the menu continues; terminal errors end the session
fn report(error: Box<dyn std::error::Error>) -> CliResult<()> {
    match error.downcast::<VaultError>() {
        Ok(vault_error) => {
            eprintln!("{vault_error}");
            Ok(())
        }
        Err(other) => Err(other),
    }
}

/// Leaving the menu ends an authenticated session, so it needs a yes
fn quit_confirmed(confirm: &dyn Confirm) -> bool {
    confirm.confirm("Quit pinvault? You will need your PIN to open the vault again.")
}

fn ask(prompt: &str) -> CliResult<bool> {
    Ok(ConfirmPrompt::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

fn pick_title<S: LocationStore>(session: &VaultSession<S>) -> CliResult<Option<String>> {
    let titles = session.list()?;
    if titles.is_empty() {
        println!("The vault is empty.");
        return Ok(None);
    }

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Record")
        .items(&titles)
        .default(0)
        .interact_opt()?;
    Ok(index.map(|i| titles[i].to_string()))
}

fn list<S: LocationStore>(session: &VaultSession<S>) -> CliResult<()> {
    let titles = session.list()?;
    if titles.is_empty() {
        println!("The vault is empty.");
    }
    for title in titles {
        println!("  {title}");
    }
    Ok(())
}

fn view<S: LocationStore>(session: &VaultSession<S>) -> CliResult<()> {
    let Some(title) = pick_title(session)? else {
        return Ok(());
    };

    let entry = session.get(&title)?;
    println!("\n{title}\n{}\n", entry.content);
    if let Some(path) = session.attachment_path(&title)? {
        println!("Attachment: {}", path.display());
    }
    Ok(())
}

fn save<S: LocationStore>(session: &mut VaultSession<S>) -> CliResult<()> {
    let theme = ColorfulTheme::default();
    let title: String = Input::with_theme(&theme)
        .with_prompt("Title")
        .interact_text()?;

    let existing = session.get(title.trim()).ok().map(|entry| entry.content.clone());
    let mut input = Input::<String>::with_theme(&theme).with_prompt("Content");
    if let Some(content) = existing {
        input = input.with_initial_text(content);
    }
    let content = input.interact_text()?;

    let attachment: String = Input::with_theme(&theme)
        .with_prompt("Attach file (leave empty for none)")
        .allow_empty(true)
        .interact_text()?;
    let attachment = expand_path(&attachment);

    session.upsert(&title, &content, attachment.as_deref())?;
    println!("Saved.");
    Ok(())
}

fn delete<S: LocationStore>(session: &mut VaultSession<S>) -> CliResult<()> {
    let Some(title) = pick_title(session)? else {
        return Ok(());
    };

    if ask(&format!("Delete '{title}'?"))? {
        session.delete(&title)?;
        println!("Deleted.");
    }
    Ok(())
}

fn change_pin<S: LocationStore>(session: &mut VaultSession<S>) -> CliResult<()> {
    let current = Zeroizing::new(
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Current PIN")
            .interact()?,
    );
    let proposed = Zeroizing::new(
        Password::with_theme(&ColorfulTheme::default())
            .with_prompt("New PIN")
            .with_confirmation("Confirm new PIN", "PINs do not match")
            .interact()?,
    );

    session.change_pin(&current, &proposed)?;
    println!("PIN changed.");
    Ok(())
}

fn backup<S: LocationStore>(session: &VaultSession<S>) -> CliResult<()> {
    let path = session.backup()?;
    println!("Backup written to {}", path.display());
    Ok(())
}

fn restore<S: LocationStore>(session: &mut VaultSession<S>) -> CliResult<()> {
    let backups = session.list_backups()?;
    if backups.is_empty() {
        println!("No backups found.");
        return Ok(());
    }

    let labels: Vec<String> = backups
        .iter()
        .map(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        })
        .collect();

    let Some(index) = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Restore which backup?")
        .items(&labels)
        .default(labels.len() - 1)
        .interact_opt()?
    else {
        return Ok(());
    };

    if !ask("This replaces every record in the vault. Continue?")? {
        return Ok(());
    }

    let count = session.restore(&backups[index])?;
    println!("Restored {count} record(s).");
    Ok(())
}

fn expand_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let expanded = shellexpand::full(raw)
        .map(|path| path.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    Some(PathBuf::from(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_path_blank_is_none() {
        assert_eq!(expand_path("   "), None);
    }

    #[test]
    fn test_expand_path_trims() {
        assert_eq!(expand_path(" /tmp/a.txt "), Some(PathBuf::from("/tmp/a.txt")));
    }

    #[test]
    fn test_quit_requires_confirmation() {
        assert!(!quit_confirmed(&|_: &str| false));
        assert!(quit_confirmed(&|prompt: &str| prompt.starts_with("Quit")));
    }

    #[test]
    fn test_vault_errors_are_reported_not_fatal() {
        let error: Box<dyn std::error::Error> = Box::new(VaultError::IncorrectPin);
        assert!(report(error).is_ok());
    }

    #[test]
    fn test_terminal_errors_propagate() {
        let error: Box<dyn std::error::Error> = "terminal closed".into();
        assert!(report(error).is_err());
    }
}
