//! `securepass delete`: remove a website's credentials.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_session, prompt_failed, Cli};
use crate::errors::{Result, SecurePassError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, website: &str, force: bool) -> Result<()> {
    let mut session = open_session(cli)?;

    // Fail before asking for confirmation if there is nothing to delete.
    if !session.contains_entry(website) {
        return Err(SecurePassError::NotFound(website.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete the entry for {website}?"
            ))
            .default(false)
            .interact_opt()
            .map_err(|e| prompt_failed("confirm prompt", e))?
            .ok_or(SecurePassError::UserCancelled)?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    session.delete_entry(website)?;
    output::success(&format!("Deleted entry for '{website}'"));

    Ok(())
}
