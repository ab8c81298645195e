//! CLI module: Clap argument parser, prompts, output helpers, and command
//! implementations.

pub mod clipboard;
pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{Settings, VaultPaths};
use crate::errors::{Result, SecurePassError};
use crate::session::{PasswordPrompt, Session};

/// Environment variable that supplies the master password non-interactively.
pub const PASSWORD_ENV: &str = "SECUREPASS_PASSWORD";

/// SecurePass CLI: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "securepass",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the salt, verifier, vault and log files
    /// (overrides `data_dir` in .securepass.toml)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the master password
    Init,

    /// Add or replace the credentials for a website
    Add {
        /// Website name (e.g. bank.com)
        website: String,
        /// Username (omit for interactive prompt)
        username: Option<String>,
        /// Password (omit for interactive prompt)
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,
        /// Generate a random password of this length instead
        #[arg(short, long, value_name = "LENGTH")]
        generate: Option<usize>,
    },

    /// Show the credentials for a website
    View {
        /// Website name
        website: String,
        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// List stored websites and usernames
    List {
        /// Only show entries whose website or username contains this text
        filter: Option<String>,
    },

    /// Delete the credentials for a website
    Delete {
        /// Website name
        website: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Number of characters (default from config, 16)
        length: Option<usize>,
        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// Delete the master password, salt and vault
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.securepass.toml` from the working directory and apply the
/// `--data-dir` override.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    Ok(settings)
}

/// Resolve every file path for this invocation.
pub fn resolve_paths(cli: &Cli) -> Result<(Settings, VaultPaths)> {
    let settings = load_settings(cli)?;
    let cwd = std::env::current_dir()?;
    let paths = settings.paths(&cwd);
    Ok((settings, paths))
}

/// Start the security log.  Failure only produces a warning.
pub fn init_logging(cli: &Cli) {
    let path = match resolve_paths(cli) {
        Ok((_, paths)) => paths.log,
        Err(_) => return,
    };
    if let Err(e) = crate::logging::init(&path) {
        output::warning(&format!("Security log unavailable: {e}"));
    }
}

/// Build the password callback for `Session::setup_or_verify`.
///
/// Tries, in order:
/// 1. `SECUREPASS_PASSWORD` env var (once; a rejected env password cannot
///    be re-prompted, so the second call fails)
/// 2. Interactive prompt
///
/// Passwords are returned as `Zeroizing<String>` so they are wiped on drop.
pub fn password_prompter() -> impl FnMut(PasswordPrompt) -> Result<Zeroizing<String>> {
    let mut from_env = std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new);
    let mut env_used = false;

    move |kind| {
        if let Some(pw) = from_env.take() {
            env_used = true;
            return Ok(pw);
        }
        if env_used {
            return Err(SecurePassError::CommandFailed(format!(
                "master password from {PASSWORD_ENV} was rejected"
            )));
        }

        let prompt = dialoguer::Password::new().allow_empty_password(true);
        let prompt = match kind {
            PasswordPrompt::Create => prompt
                .with_prompt("Create your master password")
                .with_confirmation("Confirm master password", "Passwords do not match, try again"),
            PasswordPrompt::Enter => prompt.with_prompt("Enter master password"),
        };
        let pw = prompt
            .interact()
            .map_err(|e| prompt_failed("password prompt", e))?;
        Ok(Zeroizing::new(pw))
    }
}

/// Map a failed dialoguer prompt to our error type.  An interrupted
/// prompt means the user backed out.
pub(crate) fn prompt_failed(what: &str, err: dialoguer::Error) -> SecurePassError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => {
            SecurePassError::UserCancelled
        }
        other => SecurePassError::CommandFailed(format!("{what}: {other}")),
    }
}

/// Unlock the vault for this invocation, walking the user through setup
/// if no master password exists yet.
pub fn open_session(cli: &Cli) -> Result<Session> {
    let (settings, paths) = resolve_paths(cli)?;
    Session::setup_or_verify(
        &paths,
        settings.kdf_params(),
        password_prompter(),
        output::warning,
    )
}

/// Path of the vault directory for display purposes.
pub fn data_dir_display(paths: &VaultPaths) -> PathBuf {
    paths
        .data_dir
        .canonicalize()
        .unwrap_or_else(|_| paths.data_dir.clone())
}
