//! Fernet authenticated encryption.
//!
//! A token is the URL-safe base64 encoding of:
//!
//! ```text
//! [0x80: 1 byte][timestamp: 8 bytes BE][IV: 16 bytes][AES-128-CBC ciphertext][HMAC-SHA256: 32 bytes]
//! ```
//!
//! - **Version** (`0x80`): the only Fernet version.
//! - **Timestamp**: seconds since the Unix epoch at encryption time.
//! - **IV**: fresh random bytes for every token.
//! - **Ciphertext**: PKCS#7-padded plaintext under the encryption half of
//!   the key.
//! - **HMAC**: tag under the signing half of the key, covering every
//!   preceding byte.
//!
//! The tag is checked before anything is decrypted.

use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::crypto::kdf::DerivedKey;
use crate::errors::{Result, SecurePassError};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Fernet version byte.
const VERSION: u8 = 0x80;

const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const HMAC_LEN: usize = 32;

/// Version + timestamp + IV.
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

/// Smallest valid token: header, one cipher block, tag.
const MIN_TOKEN_LEN: usize = HEADER_LEN + BLOCK_LEN + HMAC_LEN;

/// Encrypts and decrypts tokens under one derived key.
///
/// The key is zeroized when the cipher is dropped.
#[derive(Debug)]
pub struct Cipher {
    key: DerivedKey,
}

impl Cipher {
    pub fn new(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` into a new token.
    ///
    /// Every call uses a fresh IV and the current time, so encrypting the
    /// same plaintext twice never yields the same token.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let mut iv = [0u8; IV_LEN];
        rand::rng().fill_bytes(&mut iv);
        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0);
        self.encrypt_at(plaintext, now, &iv)
    }

    /// Encrypt with an explicit timestamp and IV.
    pub(crate) fn encrypt_at(
        &self,
        plaintext: &[u8],
        timestamp: u64,
        iv: &[u8; IV_LEN],
    ) -> Result<String> {
        let ciphertext = Aes128CbcEnc::new_from_slices(self.key.encryption_key(), iv)
            .map_err(|e| SecurePassError::Format(format!("invalid cipher key: {e}")))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + HMAC_LEN);
        token.push(VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(iv);
        token.extend_from_slice(&ciphertext);

        let tag = self.mac(&token)?.finalize().into_bytes();
        token.extend_from_slice(&tag);

        Ok(URL_SAFE.encode(token))
    }

    /// Verify and decrypt a token.
    ///
    /// Returns `Format` for tokens that cannot be parsed and
    /// `Authentication` when the tag does not verify (wrong key or
    /// tampering).  No plaintext is produced unless the tag verifies.
    pub fn decrypt(&self, token: &str) -> Result<Vec<u8>> {
        let data = URL_SAFE
            .decode(token.trim())
            .map_err(|e| SecurePassError::Format(format!("token is not valid base64: {e}")))?;

        if data.len() < MIN_TOKEN_LEN {
            return Err(SecurePassError::Format("token is too short".into()));
        }
        if data[0] != VERSION {
            return Err(SecurePassError::Format(format!(
                "unsupported token version 0x{:02x}",
                data[0]
            )));
        }
        if (data.len() - HEADER_LEN - HMAC_LEN) % BLOCK_LEN != 0 {
            return Err(SecurePassError::Format(
                "ciphertext is not a whole number of blocks".into(),
            ));
        }

        // Check the tag over the raw bytes before touching the ciphertext.
        let (signed, tag) = data.split_at(data.len() - HMAC_LEN);
        self.mac(signed)?
            .verify_slice(tag)
            .map_err(|_| SecurePassError::Authentication)?;

        let iv = &signed[1 + TIMESTAMP_LEN..HEADER_LEN];
        let ciphertext = &signed[HEADER_LEN..];

        Aes128CbcDec::new_from_slices(self.key.encryption_key(), iv)
            .map_err(|e| SecurePassError::Format(format!("invalid cipher key: {e}")))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| SecurePassError::Format("invalid padding".into()))
    }

    fn mac(&self, signed: &[u8]) -> Result<Hmac<Sha256>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.key.signing_key())
            .map_err(|e| SecurePassError::Format(format!("invalid HMAC key: {e}")))?;
        mac.update(signed);
        Ok(mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Key from the published Fernet test vectors.
    const VECTOR_KEY: &str = "cw_0x689RpI-jtRR7oE8h_eQsKImvJapLeSbXpwF4e4=";
    const VECTOR_TOKEN: &str = "gAAAAAAdwJ6wAAECAwQFBgcICQoLDA0ODy021cpGVWKZ_eEwCGM4BLLF_5CV9dOPmrhuVUPgJobwOz7JcbmrR64jVmpU4IwqDA==";
    const VECTOR_TIME: u64 = 499_162_800;

    fn vector_cipher() -> Cipher {
        Cipher::new(DerivedKey::from_base64(VECTOR_KEY).unwrap())
    }

    #[test]
    fn encrypt_matches_published_vector() {
        let iv: [u8; IV_LEN] = std::array::from_fn(|i| i as u8);
        let token = vector_cipher()
            .encrypt_at(b"hello", VECTOR_TIME, &iv)
            .unwrap();
        assert_eq!(token, VECTOR_TOKEN);
    }

    #[test]
    fn decrypt_published_vector() {
        let plaintext = vector_cipher().decrypt(VECTOR_TOKEN).unwrap();
        assert_eq!(plaintext, b"hello");
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let cipher = vector_cipher();
        let token = cipher.encrypt(b"").unwrap();
        assert_eq!(cipher.decrypt(&token).unwrap(), b"");
    }

    #[test]
    fn wrong_version_is_format_error() {
        let mut raw = URL_SAFE.decode(VECTOR_TOKEN).unwrap();
        raw[0] = 0x81;
        let token = URL_SAFE.encode(raw);
        assert!(matches!(
            vector_cipher().decrypt(&token),
            Err(SecurePassError::Format(_))
        ));
    }

    #[test]
    fn partial_block_is_format_error() {
        let mut raw = URL_SAFE.decode(VECTOR_TOKEN).unwrap();
        raw.push(0);
        let token = URL_SAFE.encode(raw);
        assert!(matches!(
            vector_cipher().decrypt(&token),
            Err(SecurePassError::Format(_))
        ));
    }

    #[test]
    fn garbage_is_format_error() {
        let cipher = vector_cipher();
        for token in ["", "not a token!", "gAAAA", "====="] {
            assert!(
                matches!(cipher.decrypt(token), Err(SecurePassError::Format(_))),
                "{token:?} should be rejected as malformed"
            );
        }
    }

    #[test]
    fn flipped_tag_is_authentication_error() {
        let mut raw = URL_SAFE.decode(VECTOR_TOKEN).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let token = URL_SAFE.encode(raw);
        assert!(matches!(
            vector_cipher().decrypt(&token),
            Err(SecurePassError::Authentication)
        ));
    }
}
