//! Installation salt: 16 random bytes generated once and reused forever.
//!
//! Regenerating the salt while a vault exists would make every stored
//! ciphertext undecryptable, so `SaltStore::ensure` only ever writes a
//! salt when no salt file is present.

use std::fs;
use std::path::{Path, PathBuf};

use rand::TryRngCore;

use crate::crypto::write_private_file;
use crate::errors::{Result, SecurePassError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// A 16-byte key derivation salt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Wrap raw salt bytes.
    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Draw a fresh salt from the operating system's CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; SALT_LEN];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SecurePassError::io_other(format!("OS random source failed: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

/// Owns the salt file on disk.
#[derive(Debug, Clone)]
pub struct SaltStore {
    path: PathBuf,
}

impl SaltStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a salt file is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Return the persisted salt, generating and persisting one first if
    /// none exists yet.
    pub fn ensure(&self) -> Result<Salt> {
        if self.path.exists() {
            let salt = self.load()?;
            tracing::debug!("Loaded salt from {}", self.path.display());
            return Ok(salt);
        }

        let salt = Salt::generate()?;
        write_private_file(&self.path, salt.as_bytes())?;
        tracing::info!("Generated new salt at {}", self.path.display());
        Ok(salt)
    }

    /// Read an existing salt.  A missing or wrongly-sized file is an error;
    /// nothing is ever regenerated here.
    pub fn load(&self) -> Result<Salt> {
        let data = fs::read(&self.path)?;
        let bytes: [u8; SALT_LEN] = data.as_slice().try_into().map_err(|_| {
            SecurePassError::io_other(format!(
                "salt file {} is corrupt: expected {SALT_LEN} bytes, got {}",
                self.path.display(),
                data.len()
            ))
        })?;
        Ok(Salt(bytes))
    }

    /// Remove the salt file (used by an explicit vault reset).
    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
