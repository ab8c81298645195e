use thiserror::Error;

/// All errors that can occur in SecurePass.
#[derive(Debug, Error)]
pub enum SecurePassError {
    // --- Input errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("No entry found for '{0}'")]
    NotFound(String),

    // --- Crypto errors ---
    #[error("Authentication failed: wrong master password or tampered data")]
    Authentication,

    #[error("Malformed data: {0}")]
    Format(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl SecurePassError {
    /// Build an `Io` error with a custom message, used when a file exists
    /// but its content cannot be trusted (e.g. a truncated salt file).
    pub fn io_other(msg: impl Into<String>) -> Self {
        Self::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, msg.into()))
    }
}

/// Convenience type alias for SecurePass results.
pub type Result<T> = std::result::Result<T, SecurePassError>;
