//! keepsake-crypto: the sealed-blob wire format
//!
//! Exactly one format is supported. The historical gift-site variants
//! (AES-GCM/PBKDF2 `.wenc`, libsodium secretstream `.enc`, ...) share no
//! reliable discriminant, so they are treated as unsupported legacy formats
//! rather than guessed at.
//!
//! Layout (binary):
//! ```text
//! [8 bytes: magic "KEEPSAK1"][16 bytes: salt][chunks...]
//!
//! chunk = [24-byte nonce][ciphertext][16-byte Poly1305 tag]
//! AAD   = chunk_index (u64 BE) || finality flag (1 byte)
//! ```
//!
//! The chunk-index AAD rejects reordered chunks; the finality flag rejects
//! blobs truncated at a chunk boundary. The Argon2id cost parameters are part
//! of the wire contract: they are fixed at seal time and never negotiated or
//! auto-detected, so opening with a different tier fails authentication even
//! with the correct passphrase.

pub mod chunk;
pub mod envelope;
pub mod kdf;

pub use envelope::{open, parse, seal, Envelope};
pub use kdf::{derive_key, KdfParams, MasterKey};

/// Magic marker at the start of every sealed blob
pub const MAGIC: [u8; 8] = *b"KEEPSAK1";

/// Size of the per-file Argon2id salt
pub const SALT_SIZE: usize = 16;

/// Size of a derived key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Plaintext bytes per chunk (except the final chunk, which may be shorter)
pub const CHUNK_SIZE: usize = 256 * 1024;

/// Per-chunk framing overhead: nonce + tag
pub const CHUNK_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

/// Smallest possible sealed blob: header plus one empty final chunk
pub const MIN_BLOB_SIZE: usize = MAGIC.len() + SALT_SIZE + CHUNK_OVERHEAD;
