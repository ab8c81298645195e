//! `securepass init`: create the master password.

use crate::cli::output;
use crate::cli::{data_dir_display, open_session, resolve_paths, Cli};
use crate::errors::{Result, SecurePassError};
use crate::session::Session;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (_, paths) = resolve_paths(cli)?;

    // 1. Refuse to overwrite an existing master password.
    if Session::is_initialized(&paths) {
        output::tip("Use `securepass reset` to start over.");
        return Err(SecurePassError::Validation(format!(
            "a master password already exists at {}",
            paths.verifier.display()
        )));
    }

    // 2. Run first-run setup (prompts for the new password).
    let session = open_session(cli)?;

    output::success(&format!(
        "Master password created in {}",
        data_dir_display(&paths).display()
    ));
    if session.entry_count() > 0 {
        output::info(&format!(
            "Existing vault has {} entries",
            session.entry_count()
        ));
    }

    // 3. Show helpful tips.
    output::tip("Run `securepass add <WEBSITE>` to store a password.");
    output::tip("Run `securepass list` to see stored entries.");

    Ok(())
}
