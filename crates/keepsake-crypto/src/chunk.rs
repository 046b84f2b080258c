//! Per-chunk XChaCha20-Poly1305 encryption/decryption
//!
//! Encrypted chunk format (binary):
//! ```text
//! [24 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! AAD = chunk_index (8 bytes, big-endian) || finality flag (1 byte)
//! ```
//!
//! The AAD binds each chunk to its position and marks the final chunk, so
//! reordering chunks or dropping trailing chunks fails authentication.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use keepsake_core::{RetrievalError, UnlockError};
use rand::RngCore;

use crate::kdf::MasterKey;
use crate::{CHUNK_OVERHEAD, NONCE_SIZE};

/// Finality flag values in the chunk AAD
const FLAG_MORE: u8 = 0;
const FLAG_FINAL: u8 = 1;

/// Encrypt a single chunk.
///
/// Returns `[24-byte nonce][ciphertext][16-byte tag]`.
pub fn encrypt_chunk(
    key: &MasterKey,
    chunk_index: u64,
    is_final: bool,
    plaintext: &[u8],
) -> anyhow::Result<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let aad = build_aad(chunk_index, is_final);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|e| anyhow::anyhow!("chunk encryption failed: {e}"))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt a single chunk.
///
/// A failed tag check means wrong key, tampered data, or a chunk that was
/// moved or re-flagged; all surface as [`UnlockError::Authentication`].
pub fn decrypt_chunk(
    key: &MasterKey,
    chunk_index: u64,
    is_final: bool,
    encrypted: &[u8],
) -> Result<Vec<u8>, UnlockError> {
    if encrypted.len() < CHUNK_OVERHEAD {
        return Err(RetrievalError::Truncated.into());
    }

    let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
    let nonce = XNonce::from_slice(nonce_bytes);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let aad = build_aad(chunk_index, is_final);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad: &aad,
            },
        )
        .map_err(|_| UnlockError::Authentication)
}

/// Build AAD: chunk_index (8 bytes BE) || finality flag (1 byte)
fn build_aad(chunk_index: u64, is_final: bool) -> [u8; 9] {
    let mut aad = [0u8; 9];
    aad[..8].copy_from_slice(&chunk_index.to_be_bytes());
    aad[8] = if is_final { FLAG_FINAL } else { FLAG_MORE };
    aad
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KEY_SIZE;

    fn test_key() -> MasterKey {
        MasterKey::from_bytes([42u8; KEY_SIZE])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = b"hello, sealed world!";

        let encrypted = encrypt_chunk(&key, 0, true, plaintext).unwrap();
        let decrypted = decrypt_chunk(&key, 0, true, &encrypted).unwrap();

        assert_eq!(&decrypted, plaintext);
    }

    #[test]
    fn test_encrypt_decrypt_empty() {
        let key = test_key();

        let encrypted = encrypt_chunk(&key, 0, true, b"").unwrap();
        let decrypted = decrypt_chunk(&key, 0, true, &encrypted).unwrap();

        assert_eq!(decrypted, b"");
    }

    #[test]
    fn test_decrypt_wrong_key() {
        let key1 = MasterKey::from_bytes([1u8; KEY_SIZE]);
        let key2 = MasterKey::from_bytes([2u8; KEY_SIZE]);

        let encrypted = encrypt_chunk(&key1, 0, true, b"secret data").unwrap();
        let result = decrypt_chunk(&key2, 0, true, &encrypted);

        assert!(matches!(result, Err(UnlockError::Authentication)));
    }

    #[test]
    fn test_decrypt_wrong_chunk_index() {
        let key = test_key();

        let encrypted = encrypt_chunk(&key, 0, false, b"secret data").unwrap();
        let result = decrypt_chunk(&key, 1, false, &encrypted);

        assert!(
            matches!(result, Err(UnlockError::Authentication)),
            "wrong chunk_index must fail (AAD mismatch)"
        );
    }

    #[test]
    fn test_decrypt_wrong_finality_flag() {
        let key = test_key();

        let encrypted = encrypt_chunk(&key, 3, false, b"secret data").unwrap();
        let result = decrypt_chunk(&key, 3, true, &encrypted);

        assert!(
            matches!(result, Err(UnlockError::Authentication)),
            "re-flagged chunk must fail (AAD mismatch)"
        );
    }

    #[test]
    fn test_tampered_ciphertext() {
        let key = test_key();

        let mut encrypted = encrypt_chunk(&key, 0, true, b"secret data").unwrap();
        // Flip a byte in the ciphertext (after nonce)
        encrypted[NONCE_SIZE + 1] ^= 0xFF;

        let result = decrypt_chunk(&key, 0, true, &encrypted);
        assert!(matches!(result, Err(UnlockError::Authentication)));
    }

    #[test]
    fn test_short_chunk_is_truncation_not_auth() {
        let key = test_key();
        let result = decrypt_chunk(&key, 0, true, &[0u8; CHUNK_OVERHEAD - 1]);

        assert!(matches!(
            result,
            Err(UnlockError::Retrieval(RetrievalError::Truncated))
        ));
    }

    #[test]
    fn test_encrypted_size() {
        let key = test_key();
        let plaintext = vec![0u8; 1000];

        let encrypted = encrypt_chunk(&key, 0, true, &plaintext).unwrap();

        // nonce (24) + plaintext (1000) + tag (16)
        assert_eq!(encrypted.len(), CHUNK_OVERHEAD + 1000);
    }
}
