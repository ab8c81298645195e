//! Styled terminal output for the securepass commands.
//!
//! Results go to stdout; warnings and errors go to stderr so that
//! `securepass generate` output can be piped.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::EntrySummary;

/// Green check mark, stdout.
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Red cross, stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Yellow warning sign, stderr. Also the notice sink for sessions.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Blue info sign, stdout.
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Dimmed hint line.
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Website/username table for `list`. Passwords are never shown here.
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("No matching entries.");
        tip("Run `securepass add <WEBSITE>` to store a password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Website", "Username"]);

    for entry in entries {
        table.add_row(vec![entry.website.as_str(), entry.username.as_str()]);
    }

    println!("{table}");
}
