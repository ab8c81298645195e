//! Master password setup and verification.
//!
//! On first run the master password is encrypted under the key derived
//! from itself and the result (the verifier token) is written to disk.
//! On later runs a candidate password is accepted only if that token
//! decrypts under the candidate's key to exactly the candidate.

use std::fs;
use std::path::{Path, PathBuf};

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::crypto::fernet::Cipher;
use crate::crypto::kdf::{derive_key_with_params, KdfParams};
use crate::crypto::salt::{Salt, SaltStore};
use crate::crypto::write_private_file;
use crate::errors::{Result, SecurePassError};

/// The result of a successful first-run setup.
#[derive(Debug)]
pub struct Enrollment {
    pub salt: Salt,
    /// The verifier token as written to disk.
    pub verifier: String,
    /// A cipher keyed for this session.
    pub cipher: Cipher,
}

/// Creates and checks the master password verifier.
#[derive(Debug, Clone)]
pub struct Authenticator {
    salt_store: SaltStore,
    verifier_path: PathBuf,
    params: KdfParams,
}

impl Authenticator {
    pub fn new(salt_store: SaltStore, verifier_path: impl Into<PathBuf>, params: KdfParams) -> Self {
        Self {
            salt_store,
            verifier_path: verifier_path.into(),
            params,
        }
    }

    pub fn verifier_path(&self) -> &Path {
        &self.verifier_path
    }

    /// Returns `true` once a verifier has been written.
    pub fn is_initialized(&self) -> bool {
        self.verifier_path.exists()
    }

    /// First-run setup: ensure a salt, derive the key, and seal the
    /// password into the verifier file.
    ///
    /// An empty password is rejected before any cryptographic work, and
    /// an existing verifier is never overwritten.
    pub fn setup(&self, password: &str) -> Result<Enrollment> {
        if password.is_empty() {
            return Err(SecurePassError::Validation(
                "master password cannot be empty".into(),
            ));
        }
        if self.is_initialized() {
            return Err(SecurePassError::Validation(format!(
                "a master password is already set ({} exists)",
                self.verifier_path.display()
            )));
        }

        let salt = self.salt_store.ensure()?;
        let cipher = Cipher::new(derive_key_with_params(
            password.as_bytes(),
            &salt,
            &self.params,
        )?);

        let verifier = cipher.encrypt(password.as_bytes())?;
        write_private_file(&self.verifier_path, verifier.as_bytes())?;
        tracing::info!("Master password created");

        Ok(Enrollment {
            salt,
            verifier,
            cipher,
        })
    }

    /// Check `candidate` against the stored verifier.
    ///
    /// Returns a keyed cipher on success.  A wrong password or a tampered
    /// verifier yields `Authentication`; an unparseable verifier yields
    /// `Format`; a missing salt or verifier file yields `Io`.
    pub fn unlock(&self, candidate: &str) -> Result<Cipher> {
        let salt = self.salt_store.load()?;
        let token = fs::read_to_string(&self.verifier_path)?;

        let cipher = Cipher::new(derive_key_with_params(
            candidate.as_bytes(),
            &salt,
            &self.params,
        )?);

        let outcome = cipher.decrypt(&token).and_then(|plaintext| {
            let plaintext = Zeroizing::new(plaintext);
            if bool::from(plaintext.as_slice().ct_eq(candidate.as_bytes())) {
                Ok(())
            } else {
                Err(SecurePassError::Authentication)
            }
        });

        match outcome {
            Ok(()) => {
                tracing::info!("Master password verified");
                Ok(cipher)
            }
            Err(e) => {
                tracing::warn!("Master password verification failed: {e}");
                Err(e)
            }
        }
    }

    /// `true` if `candidate` is the master password.
    ///
    /// Every failure, including IO errors, collapses to `false`; use
    /// `unlock` to tell them apart.
    pub fn verify(&self, candidate: &str) -> bool {
        self.unlock(candidate).is_ok()
    }

    /// Forget the master password: delete the verifier and the salt.
    ///
    /// Anything encrypted under the old key becomes unreadable.
    pub fn reset(&self) -> Result<()> {
        if self.verifier_path.exists() {
            fs::remove_file(&self.verifier_path)?;
        }
        self.salt_store.remove()?;
        tracing::warn!("Master password and salt removed");
        Ok(())
    }
}
