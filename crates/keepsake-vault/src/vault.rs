//! The codeword dictionary.

use anyhow::{Context, Result};
use keepsake_core::Entry;
use std::collections::BTreeMap;
use std::path::Path;

use crate::normalize::{levenshtein, normalize_code};

/// Maximum edit distance for a wrong guess to count as "close".
const NEAR_MISS_DISTANCE: usize = 2;

/// A static dictionary of normalized codeword → entry.
#[derive(Debug, Clone)]
pub struct Vault {
    entries: BTreeMap<String, Entry>,
}

impl Vault {
    /// Build a vault from already-authored entries, normalizing the keys.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Entry)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(code, entry)| (normalize_code(&code), entry))
            .filter(|(code, _)| !code.is_empty())
            .collect();
        Self { entries }
    }

    /// Load the dictionary from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading vault: {}", path.display()))?;
        let raw: BTreeMap<String, Entry> = serde_json::from_str(&content)
            .with_context(|| format!("parsing vault: {}", path.display()))?;

        let vault = Self::from_entries(raw);
        tracing::debug!(entries = vault.len(), path = %path.display(), "loaded vault");
        Ok(vault)
    }

    /// Look up an entry by normalized code.
    pub fn get(&self, code: &str) -> Option<&Entry> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All normalized codes, in stable order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Whether a wrong guess lands close enough to some code to encourage.
    pub fn is_near_miss(&self, guess: &str) -> bool {
        if guess.is_empty() {
            return false;
        }
        self.entries
            .keys()
            .any(|code| levenshtein(guess, code) <= NEAR_MISS_DISTANCE)
    }
}
