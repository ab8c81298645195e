//! `securepass generate`: print a random password.

use zeroize::Zeroizing;

use crate::cli::{clipboard, load_settings, open_session, output, Cli};
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>, copy: bool) -> Result<()> {
    let length = match length {
        Some(n) => n,
        None => load_settings(cli)?.default_password_length,
    };

    let session = open_session(cli)?;
    let password = Zeroizing::new(session.generate_password(length)?);

    println!("{}", password.as_str());

    if copy && clipboard::copy(&password) {
        output::success(&format!(
            "New {length}-character password copied to clipboard!"
        ));
    }

    Ok(())
}
