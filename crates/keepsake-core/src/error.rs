use thiserror::Error;

/// Outcome of a failed unlock attempt.
///
/// The two wire-level categories must never be confused: the corrective user
/// action differs (re-enter the passphrase vs. retry the fetch), so the UI
/// needs to tell "wrong password" apart from "broken link".
#[derive(Debug, Error)]
pub enum UnlockError {
    /// The AEAD tag check failed: wrong passphrase or tampered/corrupted
    /// ciphertext. The two causes are indistinguishable by design.
    #[error("wrong passphrase or corrupted file")]
    Authentication,

    /// Rejected locally, before any network call.
    #[error("passphrase must not be empty")]
    EmptyPassphrase,

    /// The blob could not be fetched or is not a valid sealed blob.
    #[error("could not retrieve file: {0}")]
    Retrieval(#[from] RetrievalError),
}

/// Transport and format problems, each with a human-readable cause.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("file too small to be a sealed blob: {len} bytes (need at least {min})")]
    TooSmall { len: usize, min: usize },

    #[error("not a sealed blob: magic marker mismatch")]
    BadMagic,

    #[error("sealed blob is truncated mid-chunk")]
    Truncated,
}

impl UnlockError {
    /// True when the right corrective action is re-entering the passphrase.
    pub fn is_passphrase_problem(&self) -> bool {
        matches!(self, Self::Authentication | Self::EmptyPassphrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_render_distinctly() {
        let auth = UnlockError::Authentication.to_string();
        let retr = UnlockError::Retrieval(RetrievalError::BadMagic).to_string();

        assert!(auth.contains("passphrase"));
        assert!(retr.contains("could not retrieve"));
        assert_ne!(auth, retr);
    }

    #[test]
    fn test_passphrase_problem_classification() {
        assert!(UnlockError::Authentication.is_passphrase_problem());
        assert!(UnlockError::EmptyPassphrase.is_passphrase_problem());
        assert!(!UnlockError::Retrieval(RetrievalError::TooSmall { len: 3, min: 64 })
            .is_passphrase_problem());
    }

    #[test]
    fn test_retrieval_messages_are_enumerable() {
        let causes = [
            RetrievalError::Network {
                url: "https://example.com/a.enc".into(),
                reason: "connection refused".into(),
            }
            .to_string(),
            RetrievalError::Status {
                status: 404,
                url: "https://example.com/a.enc".into(),
            }
            .to_string(),
            RetrievalError::TooSmall { len: 10, min: 64 }.to_string(),
            RetrievalError::BadMagic.to_string(),
            RetrievalError::Truncated.to_string(),
        ];
        for cause in &causes {
            assert!(!cause.is_empty());
        }
        assert!(causes[1].contains("404"));
        assert!(causes[2].contains("10 bytes"));
    }
}
