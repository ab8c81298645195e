//! `securepass reset`: delete the vault, its backup, the master password
//! and the salt.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{prompt_failed, resolve_paths, Cli};
use crate::errors::{Result, SecurePassError};
use crate::session::Session;

/// Execute the `reset` command.
pub fn execute(cli: &Cli, force: bool) -> Result<()> {
    let (_, paths) = resolve_paths(cli)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Delete the master password and ALL stored passwords? This cannot be undone")
            .default(false)
            .interact_opt()
            .map_err(|e| prompt_failed("confirm prompt", e))?
            .ok_or(SecurePassError::UserCancelled)?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    Session::reset(&paths)?;

    output::success("Vault reset.");
    output::tip("Run `securepass init` to choose a new master password.");

    Ok(())
}
