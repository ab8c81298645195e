//! `securepass list`: show stored websites and usernames.

use crate::cli::output;
use crate::cli::{open_session, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, filter: Option<&str>) -> Result<()> {
    let session = open_session(cli)?;

    let entries = session.list_entries(filter.unwrap_or(""));

    match filter {
        Some(f) => output::info(&format!("{} entries matching '{f}'", entries.len())),
        None => output::info(&format!("{} entries", entries.len())),
    }

    output::print_entries_table(&entries);

    Ok(())
}
