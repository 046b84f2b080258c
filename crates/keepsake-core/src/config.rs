use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration (loaded from keepsake.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepsakeConfig {
    pub vault: VaultConfig,
    pub progress: ProgressConfig,
    pub crypto: CryptoConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Path to the codeword dictionary JSON file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Path to the progress JSON file
    pub path: PathBuf,
}

/// Sealed-blob decryption configuration.
///
/// The KDF tier is part of the wire contract: it must match whatever sealed
/// the file. There is no way to detect which tier produced a given blob, so
/// a mismatch shows up as a wrong-passphrase failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Argon2id cost tier: "standard" (64 MiB) or "low-memory" (8 MiB)
    pub kdf_tier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTP timeout in seconds for blob downloads
    pub timeout_secs: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vault.json"),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.local/share/keepsake/progress.json"),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_tier: "standard".into(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[vault]
path = "/srv/gift/vault.json"

[progress]
path = "/home/user/.keepsake/progress.json"

[crypto]
kdf_tier = "low-memory"

[fetch]
timeout_secs = 10
"#;
        let config: KeepsakeConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.vault.path, PathBuf::from("/srv/gift/vault.json"));
        assert_eq!(
            config.progress.path,
            PathBuf::from("/home/user/.keepsake/progress.json")
        );
        assert_eq!(config.crypto.kdf_tier, "low-memory");
        assert_eq!(config.fetch.timeout_secs, 10);
    }

    #[test]
    fn test_parse_defaults() {
        let config: KeepsakeConfig = toml::from_str("").unwrap();

        assert_eq!(config.vault.path, PathBuf::from("vault.json"));
        assert_eq!(config.crypto.kdf_tier, "standard");
        assert_eq!(config.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[fetch]
timeout_secs = 5
"#;
        let config: KeepsakeConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.fetch.timeout_secs, 5);
        // Defaults
        assert_eq!(config.vault.path, PathBuf::from("vault.json"));
        assert_eq!(config.crypto.kdf_tier, "standard");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = KeepsakeConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: KeepsakeConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.vault.path, parsed.vault.path);
        assert_eq!(config.crypto.kdf_tier, parsed.crypto.kdf_tier);
        assert_eq!(config.fetch.timeout_secs, parsed.fetch.timeout_secs);
    }
}
