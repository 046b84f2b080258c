//! Sealed-blob framing: header parsing, seal (reference encryptor), open.

use keepsake_core::{RetrievalError, UnlockError};
use rand::RngCore;
use secrecy::SecretString;

use crate::chunk::{decrypt_chunk, encrypt_chunk};
use crate::kdf::{derive_key, KdfParams, MasterKey};
use crate::{CHUNK_OVERHEAD, CHUNK_SIZE, MAGIC, MIN_BLOB_SIZE, SALT_SIZE};

/// A sealed blob's fixed-width header, sliced without copying the payload.
#[derive(Debug)]
pub struct Envelope<'a> {
    pub salt: [u8; SALT_SIZE],
    /// The chunked ciphertext span after magic and salt.
    pub chunks: &'a [u8],
}

/// Validate the header and slice the blob into salt and ciphertext.
///
/// Both checks run before any KDF work: a too-small or mislabeled blob must
/// fail fast as a retrieval problem, never reach decryption.
pub fn parse(blob: &[u8]) -> Result<Envelope<'_>, RetrievalError> {
    if blob.len() < MIN_BLOB_SIZE {
        return Err(RetrievalError::TooSmall {
            len: blob.len(),
            min: MIN_BLOB_SIZE,
        });
    }
    if blob[..MAGIC.len()] != MAGIC {
        return Err(RetrievalError::BadMagic);
    }

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&blob[MAGIC.len()..MAGIC.len() + SALT_SIZE]);

    Ok(Envelope {
        salt,
        chunks: &blob[MAGIC.len() + SALT_SIZE..],
    })
}

/// Seal a plaintext into a blob: the reference encryptor.
///
/// The same `params` tier must be used to open the result.
pub fn seal(
    plaintext: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> anyhow::Result<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);
    let key = derive_key(passphrase, &salt, params)?;

    let chunk_count = plaintext.len().div_ceil(CHUNK_SIZE).max(1);

    let mut blob =
        Vec::with_capacity(MAGIC.len() + SALT_SIZE + plaintext.len() + chunk_count * CHUNK_OVERHEAD);
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&salt);

    for index in 0..chunk_count {
        let start = index * CHUNK_SIZE;
        let end = (start + CHUNK_SIZE).min(plaintext.len());
        let is_final = index == chunk_count - 1;
        let encrypted = encrypt_chunk(&key, index as u64, is_final, &plaintext[start..end])?;
        blob.extend_from_slice(&encrypted);
    }

    Ok(blob)
}

/// Open a sealed blob with a passphrase.
///
/// Cost-parameter mismatches surface as authentication failures: the KDF
/// derives a different key, and there is no discriminant to tell it apart
/// from a wrong passphrase.
pub fn open(
    blob: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> Result<Vec<u8>, UnlockError> {
    let envelope = parse(blob)?;
    let key =
        derive_key(passphrase, &envelope.salt, params).map_err(|_| UnlockError::Authentication)?;
    open_chunks(&key, envelope.chunks)
}

/// Decrypt the chunked ciphertext span strictly in order.
///
/// Aborts on the first failed tag; chunks after a corrupted one are never
/// touched. Every chunk except the last is exactly full-size, so the final
/// chunk is recognized by the remaining length.
pub fn open_chunks(key: &MasterKey, mut chunks: &[u8]) -> Result<Vec<u8>, UnlockError> {
    const FULL: usize = CHUNK_SIZE + CHUNK_OVERHEAD;

    let mut plaintext = Vec::with_capacity(chunks.len());
    let mut index = 0u64;

    while chunks.len() > FULL {
        let (head, rest) = chunks.split_at(FULL);
        plaintext.extend_from_slice(&decrypt_chunk(key, index, false, head)?);
        chunks = rest;
        index += 1;
    }

    plaintext.extend_from_slice(&decrypt_chunk(key, index, true, chunks)?);
    Ok(plaintext)
}
