//! High-level vault operations used by the session and CLI.
//!
//! `VaultStore` owns the in-memory `Vault`, the cipher that seals its
//! passwords, and the path of the JSON file it is mirrored to.  Every
//! mutation rewrites the whole file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use zeroize::Zeroizing;

use crate::crypto::fernet::Cipher;
use crate::crypto::write_private_file;
use crate::errors::{Result, SecurePassError};

use super::record::{CredentialRecord, EntrySummary, Vault};

/// The main vault handle.  Create one with `VaultStore::load`, then use
/// its methods to manage credentials.
#[derive(Debug)]
pub struct VaultStore {
    /// Path to the JSON vault file on disk.
    path: PathBuf,

    /// In-memory map of website -> record.
    vault: Vault,

    /// Seals and opens the stored passwords.
    cipher: Cipher,

    /// Set when an existing vault file could not be read and the store
    /// started empty instead.
    degraded: Option<String>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Load the vault at `path`.
    ///
    /// A missing file is an empty vault.  A file that is present but
    /// cannot be read or parsed also yields an empty vault; it is first
    /// copied aside to `<file>.bak` so the next save does not destroy it,
    /// and the failure is logged and kept in `degraded()` so the caller
    /// can tell the user.
    pub fn load(path: &Path, cipher: Cipher) -> Self {
        let mut store = Self {
            path: path.to_path_buf(),
            vault: Vault::new(),
            cipher,
            degraded: None,
        };

        if !path.exists() {
            tracing::info!("No vault at {}, starting empty", path.display());
            return store;
        }

        let parsed = fs::read(path)
            .map_err(|e| format!("could not be read ({e})"))
            .and_then(|bytes| {
                serde_json::from_slice::<Vault>(&bytes).map_err(|e| format!("is corrupt ({e})"))
            });

        match parsed {
            Ok(vault) => {
                tracing::info!("Loaded {} entries from {}", vault.len(), path.display());
                store.vault = vault;
            }
            Err(problem) => {
                let backup = backup_path(path);
                let kept = match fs::copy(path, &backup) {
                    Ok(_) => format!("the unreadable file was copied to {}", backup.display()),
                    Err(copy_err) => format!("backing it up failed: {copy_err}"),
                };
                let msg = format!(
                    "vault file {} {problem}; starting with an empty vault, {kept}",
                    path.display()
                );
                tracing::error!("{msg}");
                store.degraded = Some(msg);
            }
        }

        store
    }

    /// Delete the vault file at `path` and its `.bak` copy, if present.
    pub fn remove_files(path: &Path) -> Result<()> {
        for file in [path.to_path_buf(), backup_path(path)] {
            if file.exists() {
                fs::remove_file(&file)?;
                tracing::warn!("Vault file {} removed", file.display());
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Add or replace the record for `website` and save.
    ///
    /// All three fields must be non-empty.  The password is encrypted
    /// before it is stored.  If the save fails the in-memory vault is
    /// rolled back.
    pub fn add(&mut self, website: &str, username: &str, password: &str) -> Result<()> {
        require_non_empty("website", website)?;
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;

        let record = CredentialRecord {
            username: username.to_string(),
            encrypted_password: self.cipher.encrypt(password.as_bytes())?,
        };

        let previous = self.vault.insert(website, record);
        if let Err(e) = self.save() {
            match previous {
                Some(old) => {
                    self.vault.insert(website, old);
                }
                None => {
                    self.vault.remove(website);
                }
            }
            return Err(e);
        }

        if previous.is_some() {
            tracing::info!("Updated entry for {website}");
        } else {
            tracing::info!("Added entry for {website}");
        }
        Ok(())
    }

    /// `true` if a record for `website` exists.
    pub fn contains(&self, website: &str) -> bool {
        self.vault.contains(website)
    }

    /// The stored (still encrypted) record for `website`.
    pub fn get(&self, website: &str) -> Option<&CredentialRecord> {
        self.vault.get(website)
    }

    /// Decrypt the record for `website`, returning the username and the
    /// plaintext password.
    pub fn reveal(&self, website: &str) -> Result<(String, Zeroizing<String>)> {
        let record = self
            .vault
            .get(website)
            .ok_or_else(|| SecurePassError::NotFound(website.to_string()))?;

        let bytes = self.cipher.decrypt(&record.encrypted_password).map_err(|e| {
            tracing::error!("Could not decrypt entry for {website}: {e}");
            e
        })?;
        let password = String::from_utf8(bytes).map_err(|e| {
            drop(Zeroizing::new(e.into_bytes()));
            SecurePassError::Format("stored password is not valid UTF-8".into())
        })?;

        tracing::info!("Viewed entry for {website}");
        Ok((record.username.clone(), Zeroizing::new(password)))
    }

    /// Remove the record for `website` and save.
    ///
    /// Returns `false` without touching the file if there was no such
    /// record.
    pub fn delete(&mut self, website: &str) -> Result<bool> {
        let Some(removed) = self.vault.remove(website) else {
            return Ok(false);
        };

        if let Err(e) = self.save() {
            self.vault.insert(website, removed);
            return Err(e);
        }

        tracing::info!("Deleted entry for {website}");
        Ok(true)
    }

    /// Entries whose website or username contains `filter`
    /// (case-insensitive), sorted case-insensitively by website.
    pub fn list(&self, filter: &str) -> Vec<EntrySummary> {
        let needle = filter.to_lowercase();
        let mut list: Vec<EntrySummary> = self
            .vault
            .iter()
            .filter(|(website, record)| {
                website.to_lowercase().contains(&needle)
                    || record.username.to_lowercase().contains(&needle)
            })
            .map(|(website, record)| EntrySummary {
                website: website.to_string(),
                username: record.username.clone(),
            })
            .collect();

        list.sort_by_cached_key(|entry| entry.website.to_lowercase());
        list
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the whole vault to disk as 4-space-indented JSON, via
    /// temp-file + rename.
    pub fn save(&self) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.vault
            .serialize(&mut ser)
            .map_err(|e| SecurePassError::Serialization(format!("vault: {e}")))?;

        write_private_file(&self.path, &buf)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.vault.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vault.is_empty()
    }

    /// Why the vault started empty despite a file being present, if it did.
    pub fn degraded(&self) -> Option<&str> {
        self.degraded.as_deref()
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SecurePassError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// `vault.json` -> `vault.json.bak`
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}
