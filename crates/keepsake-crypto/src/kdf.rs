//! Key derivation: Argon2id passphrase → one-shot symmetric key

use argon2::{Algorithm, Argon2, Version};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::{KEY_SIZE, SALT_SIZE};

/// A 256-bit key derived from a passphrase via Argon2id.
///
/// One-shot: scoped to a single seal/open call, never cached across
/// invocations, zeroized on drop.
#[derive(Clone)]
pub struct MasterKey {
    bytes: [u8; KEY_SIZE],
}

impl MasterKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Argon2id cost parameters.
///
/// These are part of the wire contract: the tier used to open a blob must be
/// the tier that sealed it. There is no detection mechanism, so a mismatch
/// surfaces as an authentication failure even with the correct passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub mem_cost_kib: u32,
    /// Time cost / iterations
    pub time_cost: u32,
    /// Lanes
    pub parallelism: u32,
}

impl KdfParams {
    /// Canonical tier: 64 MiB, 3 iterations, 4 lanes.
    pub const STANDARD: Self = Self {
        mem_cost_kib: 65536,
        time_cost: 3,
        parallelism: 4,
    };

    /// Tier for constrained devices: 8 MiB, 3 iterations, 1 lane.
    pub const LOW_MEMORY: Self = Self {
        mem_cost_kib: 8192,
        time_cost: 3,
        parallelism: 1,
    };

    /// Parse a tier name as used in keepsake.toml.
    pub fn from_tier(tier: &str) -> anyhow::Result<Self> {
        match tier {
            "standard" => Ok(Self::STANDARD),
            "low-memory" => Ok(Self::LOW_MEMORY),
            other => anyhow::bail!("unknown KDF tier {other:?} (expected \"standard\" or \"low-memory\")"),
        }
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Derive a 256-bit key from a passphrase and the blob's salt using Argon2id.
pub fn derive_key(
    passphrase: &SecretString,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> anyhow::Result<MasterKey> {
    let argon2_params = argon2::Params::new(
        params.mem_cost_kib,
        params.time_cost,
        params.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| anyhow::anyhow!("invalid Argon2id params: {e}"))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(passphrase.expose_secret().as_bytes(), salt, &mut key)
        .map_err(|e| anyhow::anyhow!("Argon2id KDF failed: {e}"))?;

    Ok(MasterKey::from_bytes(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fast params for testing; the round-trip law holds for any params.
    fn fast_params() -> KdfParams {
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_kdf_deterministic() {
        let passphrase = SecretString::from("correct-horse");
        let salt = [7u8; SALT_SIZE];

        let key1 = derive_key(&passphrase, &salt, &fast_params()).unwrap();
        let key2 = derive_key(&passphrase, &salt, &fast_params()).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_passphrases() {
        let salt = [7u8; SALT_SIZE];

        let key1 = derive_key(&SecretString::from("correct-horse"), &salt, &fast_params()).unwrap();
        let key2 = derive_key(&SecretString::from("wrong-horse"), &salt, &fast_params()).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different passphrases must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_salts() {
        let passphrase = SecretString::from("same-passphrase");

        let key1 = derive_key(&passphrase, &[1u8; SALT_SIZE], &fast_params()).unwrap();
        let key2 = derive_key(&passphrase, &[2u8; SALT_SIZE], &fast_params()).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different salts must produce different keys"
        );
    }

    #[test]
    fn test_kdf_different_cost_params() {
        let passphrase = SecretString::from("same-passphrase");
        let salt = [7u8; SALT_SIZE];
        let other = KdfParams {
            mem_cost_kib: 2048,
            time_cost: 1,
            parallelism: 1,
        };

        let key1 = derive_key(&passphrase, &salt, &fast_params()).unwrap();
        let key2 = derive_key(&passphrase, &salt, &other).unwrap();

        assert_ne!(
            key1.as_bytes(),
            key2.as_bytes(),
            "different cost params must produce different keys"
        );
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!(KdfParams::from_tier("standard").unwrap(), KdfParams::STANDARD);
        assert_eq!(
            KdfParams::from_tier("low-memory").unwrap(),
            KdfParams::LOW_MEMORY
        );
        assert!(KdfParams::from_tier("turbo").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = MasterKey::from_bytes([42u8; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("42"));
    }
}
