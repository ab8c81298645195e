//! Credential records and the vault map that holds them.
//!
//! On disk the vault is a JSON object keyed by website name:
//!
//! ```json
//! {
//!     "bank.com": {
//!         "username": "alice",
//!         "password": "gAAAAAB..."
//!     }
//! }
//! ```
//!
//! `password` is always a Fernet token, never plaintext.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// The account name, stored in plain text.
    pub username: String,

    /// The account password, encrypted.
    #[serde(rename = "password")]
    pub encrypted_password: String,
}

/// Website name -> record.  Keys are unique and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vault {
    entries: BTreeMap<String, CredentialRecord>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record for the same website.
    pub fn insert(&mut self, website: &str, record: CredentialRecord) -> Option<CredentialRecord> {
        self.entries.insert(website.to_string(), record)
    }

    pub fn get(&self, website: &str) -> Option<&CredentialRecord> {
        self.entries.get(website)
    }

    pub fn remove(&mut self, website: &str) -> Option<CredentialRecord> {
        self.entries.remove(website)
    }

    pub fn contains(&self, website: &str) -> bool {
        self.entries.contains_key(website)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CredentialRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A listing row: what can be shown without decrypting anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub website: String,
    pub username: String,
}
