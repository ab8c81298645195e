//! `securepass add`: store or replace a website's credentials.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_session, prompt_failed, Cli};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    website: &str,
    username: Option<&str>,
    password: Option<&str>,
    generate: Option<usize>,
) -> Result<()> {
    let mut session = open_session(cli)?;

    let username = match username {
        Some(u) => u.to_string(),
        None => dialoguer::Input::<String>::new()
            .with_prompt("Enter username")
            .interact_text()
            .map_err(|e| prompt_failed("input prompt", e))?,
    };

    // Determine the password from one of three sources.
    let password = if let Some(p) = password {
        // Source 1: Inline value on the command line.
        output::warning("Password provided on command line; it may appear in shell history.");
        Zeroizing::new(p.to_string())
    } else if let Some(length) = generate {
        // Source 2: Freshly generated.
        Zeroizing::new(session.generate_password(length)?)
    } else {
        // Source 3: Interactive secure prompt (default).
        let p = dialoguer::Password::new()
            .with_prompt(format!("Enter password for {website}"))
            .interact()
            .map_err(|e| prompt_failed("input prompt", e))?;
        Zeroizing::new(p)
    };

    let existed = session.contains_entry(website);
    session.add_entry(website, &username, &password)?;

    if existed {
        output::success(&format!("Updated password for '{website}'"));
    } else {
        output::success(&format!("Saved password for '{website}'"));
    }
    if generate.is_some() {
        output::tip(&format!(
            "Run `securepass view {website}` to see the generated password."
        ));
    }

    Ok(())
}
