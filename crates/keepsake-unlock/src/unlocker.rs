//! The unlock orchestration: fetch, validate, derive, decrypt.

use keepsake_core::UnlockError;
use keepsake_crypto::{envelope, KdfParams};
use secrecy::{ExposeSecret, SecretString};

use crate::fetch::BlobFetcher;

/// A successfully unwrapped download.
#[derive(Debug)]
pub struct Unlocked {
    /// Sanitized filename to offer in the save step.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Fetches and unwraps sealed blobs.
///
/// The KDF tier is fixed at construction and applies to every unlock; it
/// must match the tier that sealed the files being opened.
#[derive(Debug, Clone)]
pub struct Unlocker {
    fetcher: BlobFetcher,
    params: KdfParams,
}

impl Unlocker {
    pub fn new(fetcher: BlobFetcher, params: KdfParams) -> Self {
        Self { fetcher, params }
    }

    /// Fetch the blob at `url` and decrypt it with `passphrase`.
    ///
    /// `declared_name` is advisory metadata only; it is sanitized and echoed
    /// back for the caller's save step. An empty passphrase is rejected
    /// before any network activity. Exactly one attempt is made.
    pub async fn unlock(
        &self,
        url: &str,
        declared_name: &str,
        passphrase: &SecretString,
    ) -> Result<Unlocked, UnlockError> {
        if passphrase.expose_secret().is_empty() {
            return Err(UnlockError::EmptyPassphrase);
        }

        let blob = self.fetcher.fetch(url).await?;
        let bytes = envelope::open(&blob, passphrase, &self.params)?;

        let filename = sanitize_filename(declared_name);
        tracing::info!(url, filename, bytes = bytes.len(), "unlocked sealed download");

        Ok(Unlocked { filename, bytes })
    }
}

/// Clean a declared filename for the save step.
///
/// Drops any path components, strips the `.enc`/`.wenc` seal suffixes, and
/// falls back to an `unlocked_`-prefixed name when nothing with an extension
/// remains.
pub fn sanitize_filename(declared: &str) -> String {
    let base = declared
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(declared)
        .trim();

    let mut name = base;
    for suffix in [".enc", ".wenc"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped;
        }
    }

    if name.is_empty() {
        "unlocked.bin".to_string()
    } else if name.contains('.') {
        name.to_string()
    } else {
        format!("unlocked_{name}")
    }
}
