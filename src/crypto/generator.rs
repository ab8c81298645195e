//! Random password generation.

use rand::Rng;

use crate::errors::{Result, SecurePassError};

/// The 70 characters generated passwords are drawn from.
pub const ALPHABET: &[u8; 70] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

/// Generate a password of `length` characters, each drawn uniformly and
/// independently from `ALPHABET` using the thread-local CSPRNG.
pub fn generate_password(length: usize) -> Result<String> {
    if length == 0 {
        return Err(SecurePassError::Validation(
            "password length must be positive".into(),
        ));
    }

    let mut rng = rand::rng();
    let password = (0..length)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();

    tracing::info!("Generated a {length}-character password");
    Ok(password)
}
