//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The master password and the installation salt are stretched into a
//! 32-byte key.  The same password + salt + iteration count always
//! produce the same key, so the key itself is never written to disk.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::salt::{Salt, SALT_LEN};
use crate::errors::{Result, SecurePassError};

/// Length of the derived key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Minimum safe iteration count.
const MIN_ITERATIONS: u32 = 10_000;

/// Configurable PBKDF2 parameters.
///
/// Mirrors `kdf_iterations` in `Settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// A 32-byte derived key that zeroes its memory when dropped.
///
/// The first half signs tokens, the second half encrypts them.
#[derive(Zeroize, PartialEq, Eq)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// HMAC-SHA256 signing half of the key.
    pub fn signing_key(&self) -> &[u8] {
        &self.bytes[..KEY_LEN / 2]
    }

    /// AES-128 encryption half of the key.
    pub fn encryption_key(&self) -> &[u8] {
        &self.bytes[KEY_LEN / 2..]
    }

    /// The URL-safe base64 form of the key, as Fernet implementations
    /// exchange it.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(self.bytes))
    }

    /// Parse a URL-safe base64 key.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let mut decoded = URL_SAFE
            .decode(encoded.trim())
            .map_err(|e| SecurePassError::Format(format!("key is not valid base64: {e}")))?;
        if decoded.len() != KEY_LEN {
            let len = decoded.len();
            decoded.zeroize();
            return Err(SecurePassError::Format(format!(
                "key must be {KEY_LEN} bytes, got {len}"
            )));
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive a key from a password and salt with the default 100 000 iterations.
pub fn derive_key(password: &[u8], salt: &Salt) -> Result<DerivedKey> {
    derive_key_with_params(password, salt, &KdfParams::default())
}

/// Derive a key with explicit PBKDF2 parameters.
///
/// Rejects iteration counts below the safe minimum.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &Salt,
    params: &KdfParams,
) -> Result<DerivedKey> {
    if params.iterations < MIN_ITERATIONS {
        return Err(SecurePassError::Validation(format!(
            "kdf iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }
    debug_assert_eq!(salt.as_bytes().len(), SALT_LEN);

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password, salt.as_bytes(), params.iterations, &mut bytes);
    let key = DerivedKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams { iterations: 10_000 };

    #[test]
    fn default_params_match_known_answer() {
        let salt = Salt::from_bytes(std::array::from_fn(|i| i as u8));
        let key = derive_key(b"Tr0ub4dor&3", &salt).unwrap();
        assert_eq!(
            key.to_base64().as_str(),
            "DaNLPubcvPJ4Q9o13gSAZWDm9VeB9-xLASqvPmdBdF0="
        );
    }

    #[test]
    fn reduced_iterations_match_known_answer() {
        let salt = Salt::from_bytes(std::array::from_fn(|i| i as u8));
        let key = derive_key_with_params(b"Tr0ub4dor&3", &salt, &FAST).unwrap();
        assert_eq!(
            key.to_base64().as_str(),
            "rpt4p2JUu6X4aHH-pBqhasLk3xrZP-C3841x8IjDg_Q="
        );
    }

    #[test]
    fn rejects_too_few_iterations() {
        let salt = Salt::from_bytes([1u8; SALT_LEN]);
        let result = derive_key_with_params(b"pw", &salt, &KdfParams { iterations: 1 });
        assert!(matches!(result, Err(SecurePassError::Validation(_))));
    }

    #[test]
    fn iteration_count_changes_key() {
        let salt = Salt::from_bytes([2u8; SALT_LEN]);
        let a = derive_key_with_params(b"pw", &salt, &FAST).unwrap();
        let b = derive_key_with_params(b"pw", &salt, &KdfParams { iterations: 10_001 }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn base64_form_roundtrips() {
        let key = DerivedKey::new([0x5Au8; KEY_LEN]);
        let encoded = key.to_base64();
        assert_eq!(encoded.len(), 44);
        let parsed = DerivedKey::from_base64(&encoded).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn from_base64_rejects_wrong_length() {
        let short = URL_SAFE.encode([0u8; 16]);
        assert!(matches!(
            DerivedKey::from_base64(&short),
            Err(SecurePassError::Format(_))
        ));
    }

    #[test]
    fn debug_output_hides_key() {
        let key = DerivedKey::new([0x11u8; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "DerivedKey(..)");
    }
}
