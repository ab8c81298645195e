//! `securepass view`: decrypt and show one website's credentials.

use crate::cli::{clipboard, open_session, output, Cli};
use crate::errors::Result;

/// Execute the `view` command.
pub fn execute(cli: &Cli, website: &str, copy: bool) -> Result<()> {
    let session = open_session(cli)?;

    let (username, password) = session.view_entry(website)?;

    println!("Website:  {website}");
    println!("Username: {username}");
    println!("Password: {}", password.as_str());

    if copy && clipboard::copy(&password) {
        output::success("Password has been copied to clipboard!");
    }

    Ok(())
}
