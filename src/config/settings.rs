use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS};
use crate::errors::{Result, SecurePassError};

/// Installation-level configuration, loaded from `.securepass.toml`.
///
/// Every field has a sensible default so SecurePass works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory, or absolute) that
    /// holds every file below.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Raw 16-byte key derivation salt.
    #[serde(default = "default_salt_file")]
    pub salt_file: String,

    /// Encrypted master password verifier token.
    #[serde(default = "default_verifier_file")]
    pub verifier_file: String,

    /// JSON vault of website credentials.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Append-only security log.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// PBKDF2 iteration count (default: 100 000).
    ///
    /// Must not change after setup: the verifier was sealed with a key
    /// derived at this count.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Length used by `generate` when none is given.
    #[serde(default = "default_password_length")]
    pub default_password_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_salt_file() -> String {
    "salt.key".to_string()
}

fn default_verifier_file() -> String {
    "master.key".to_string()
}

fn default_vault_file() -> String {
    "vault.json".to_string()
}

fn default_log_file() -> String {
    "security.log".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_password_length() -> usize {
    16
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            salt_file: default_salt_file(),
            verifier_file: default_verifier_file(),
            vault_file: default_vault_file(),
            log_file: default_log_file(),
            kdf_iterations: default_kdf_iterations(),
            default_password_length: default_password_length(),
        }
    }
}

/// Fully resolved file locations for one installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub data_dir: PathBuf,
    pub salt: PathBuf,
    pub verifier: PathBuf,
    pub vault: PathBuf,
    pub log: PathBuf,
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    const FILE_NAME: &'static str = ".securepass.toml";

    /// Load settings from `<project_dir>/.securepass.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SecurePassError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve every file path against `project_dir`.
    ///
    /// Example: `project_dir/./vault.json` with the defaults.
    pub fn paths(&self, project_dir: &Path) -> VaultPaths {
        let data_dir = project_dir.join(&self.data_dir);
        VaultPaths {
            salt: data_dir.join(&self.salt_file),
            verifier: data_dir.join(&self.verifier_file),
            vault: data_dir.join(&self.vault_file),
            log: data_dir.join(&self.log_file),
            data_dir,
        }
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.data_dir, ".");
        assert_eq!(s.salt_file, "salt.key");
        assert_eq!(s.verifier_file, "master.key");
        assert_eq!(s.vault_file, "vault.json");
        assert_eq!(s.log_file, "security.log");
        assert_eq!(s.kdf_iterations, 100_000);
        assert_eq!(s.default_password_length, 16);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_file, "vault.json");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
data_dir = "secrets"
salt_file = "s.bin"
verifier_file = "v.tok"
vault_file = "entries.json"
log_file = "audit.log"
kdf_iterations = 200000
default_password_length = 24
"#;
        fs::write(tmp.path().join(".securepass.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.data_dir, "secrets");
        assert_eq!(settings.salt_file, "s.bin");
        assert_eq!(settings.verifier_file, "v.tok");
        assert_eq!(settings.vault_file, "entries.json");
        assert_eq!(settings.log_file, "audit.log");
        assert_eq!(settings.kdf_iterations, 200_000);
        assert_eq!(settings.default_password_length, 24);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".securepass.toml"), "kdf_iterations = 20000\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.kdf_iterations, 20_000);
        // Rest should be defaults
        assert_eq!(settings.vault_file, "vault.json");
        assert_eq!(settings.default_password_length, 16);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".securepass.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(matches!(result, Err(SecurePassError::Config(_))));
    }

    #[test]
    fn paths_resolve_under_data_dir() {
        let s = Settings {
            data_dir: "secrets".to_string(),
            ..Settings::default()
        };
        let paths = s.paths(Path::new("/home/user"));
        assert_eq!(paths.data_dir, PathBuf::from("/home/user/secrets"));
        assert_eq!(paths.salt, PathBuf::from("/home/user/secrets/salt.key"));
        assert_eq!(paths.verifier, PathBuf::from("/home/user/secrets/master.key"));
        assert_eq!(paths.vault, PathBuf::from("/home/user/secrets/vault.json"));
        assert_eq!(paths.log, PathBuf::from("/home/user/secrets/security.log"));
    }

    #[test]
    fn absolute_data_dir_wins() {
        let s = Settings {
            data_dir: "/var/lib/securepass".to_string(),
            ..Settings::default()
        };
        let paths = s.paths(Path::new("/home/user"));
        assert_eq!(paths.vault, PathBuf::from("/var/lib/securepass/vault.json"));
    }

    #[test]
    fn kdf_params_follow_settings() {
        let s = Settings {
            kdf_iterations: 50_000,
            ..Settings::default()
        };
        assert_eq!(s.kdf_params().iterations, 50_000);
    }
}
