//! System clipboard access for `view --copy` and `generate --copy`.

use crate::cli::output;

/// Put `text` on the system clipboard.
///
/// Clipboard access is optional: on a headless machine this prints a
/// warning and returns `false` instead of failing the command.
pub fn copy(text: &str) -> bool {
    let result = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));

    match result {
        Ok(()) => true,
        Err(e) => {
            output::warning(&format!("Could not copy to clipboard: {e}"));
            false
        }
    }
}
