//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `CredentialRecord`, `Vault` and `EntrySummary` types (`record`)
//! - `VaultStore`, which loads, mutates and saves the vault file (`store`)

pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use record::{CredentialRecord, EntrySummary, Vault};
pub use store::VaultStore;
