//! Cryptographic primitives for SecurePass.
//!
//! This module provides:
//! - The installation salt and its file (`salt`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - Fernet authenticated encryption tokens (`fernet`)
//! - Random password generation (`generator`)

pub mod fernet;
pub mod generator;
pub mod kdf;
pub mod salt;

use std::fs;
use std::path::Path;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, Cipher, SaltStore, ...};
pub use fernet::Cipher;
pub use generator::{generate_password, ALPHABET};
pub use kdf::{derive_key, derive_key_with_params, DerivedKey, KdfParams};
pub use salt::{Salt, SaltStore};

/// Write `data` to `path` through a temp file + rename, then restrict the
/// file to owner-only access on Unix.
///
/// The temp file lives next to the target so the rename stays on one
/// filesystem.
pub(crate) fn write_private_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    fs::write(&tmp_path, data)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Best effort: some filesystems do not support Unix modes.
        let _ = fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600));
    }

    fs::rename(&tmp_path, path)
}
