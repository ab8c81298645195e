//! The authenticated session: the only surface a front end uses.
//!
//! `Session::setup_or_verify` runs first-run setup or master password
//! verification, re-prompting until it succeeds, and then loads the
//! vault.  The returned session exposes listing, adding, viewing and
//! deleting entries, plus password generation.  `is_initialized` and
//! `reset` work on an installation without unlocking it.

use zeroize::Zeroizing;

use crate::auth::Authenticator;
use crate::config::VaultPaths;
use crate::crypto::kdf::KdfParams;
use crate::crypto::{generator, SaltStore};
use crate::errors::{Result, SecurePassError};
use crate::vault::{EntrySummary, VaultStore};

/// What the front end is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordPrompt {
    /// No master password exists yet; ask the user to choose one.
    Create,
    /// Ask for the existing master password.
    Enter,
}

/// An unlocked vault.
#[derive(Debug)]
pub struct Session {
    store: VaultStore,
}

impl Session {
    /// Set up a master password on first run, or verify it on later runs,
    /// then load the vault.
    ///
    /// `prompt` is called until setup or verification succeeds; an error
    /// returned from it (e.g. the user cancelled) aborts.  `notify`
    /// receives every recoverable problem: an empty password at setup, a
    /// wrong password, and a vault file that had to be ignored.
    ///
    /// IO failures on the salt or verifier file are fatal.
    pub fn setup_or_verify<P, N>(
        paths: &VaultPaths,
        params: KdfParams,
        mut prompt: P,
        mut notify: N,
    ) -> Result<Self>
    where
        P: FnMut(PasswordPrompt) -> Result<Zeroizing<String>>,
        N: FnMut(&str),
    {
        let auth = authenticator(paths, params);

        let cipher = if auth.is_initialized() {
            loop {
                let candidate = prompt(PasswordPrompt::Enter)?;
                match auth.unlock(&candidate) {
                    Ok(cipher) => break cipher,
                    Err(SecurePassError::Authentication | SecurePassError::Format(_)) => {
                        notify("Incorrect master password!");
                    }
                    Err(e) => return Err(e),
                }
            }
        } else {
            loop {
                let password = prompt(PasswordPrompt::Create)?;
                match auth.setup(&password) {
                    Ok(enrollment) => break enrollment.cipher,
                    Err(SecurePassError::Validation(msg)) => notify(&msg),
                    Err(e) => return Err(e),
                }
            }
        };

        let store = VaultStore::load(&paths.vault, cipher);
        if let Some(msg) = store.degraded() {
            notify(msg);
        }

        Ok(Self { store })
    }

    /// Website/username pairs matching `filter`, sorted by website.
    pub fn list_entries(&self, filter: &str) -> Vec<EntrySummary> {
        self.store.list(filter)
    }

    /// Add or replace an entry.
    pub fn add_entry(&mut self, website: &str, username: &str, password: &str) -> Result<()> {
        self.store.add(website, username, password)
    }

    /// Username and decrypted password for `website`.
    pub fn view_entry(&self, website: &str) -> Result<(String, Zeroizing<String>)> {
        self.store.reveal(website)
    }

    /// Delete the entry for `website`; unknown websites are `NotFound`.
    pub fn delete_entry(&mut self, website: &str) -> Result<()> {
        if self.store.delete(website)? {
            Ok(())
        } else {
            Err(SecurePassError::NotFound(website.to_string()))
        }
    }

    /// A fresh random password of `length` characters.
    pub fn generate_password(&self, length: usize) -> Result<String> {
        generator::generate_password(length)
    }

    /// `true` if the vault file was present but unusable at load time.
    pub fn is_degraded(&self) -> bool {
        self.store.degraded().is_some()
    }

    /// `true` if an entry for `website` exists.
    pub fn contains_entry(&self, website: &str) -> bool {
        self.store.contains(website)
    }

    /// Number of stored entries.
    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    /// `true` once a master password has been set up at `paths`.
    pub fn is_initialized(paths: &VaultPaths) -> bool {
        authenticator(paths, KdfParams::default()).is_initialized()
    }

    /// Forget everything at `paths`: the vault file and its backup first,
    /// then the verifier and the salt.
    ///
    /// If the vault cannot be removed the salt is left in place, so the
    /// vault stays decryptable.
    pub fn reset(paths: &VaultPaths) -> Result<()> {
        VaultStore::remove_files(&paths.vault)?;
        authenticator(paths, KdfParams::default()).reset()
    }
}

fn authenticator(paths: &VaultPaths, params: KdfParams) -> Authenticator {
    Authenticator::new(SaltStore::new(&paths.salt), &paths.verifier, params)
}
