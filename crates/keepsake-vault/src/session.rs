//! The guess loop: codeword in, revealed content and progress updates out.

use anyhow::Result;
use keepsake_core::Entry;
use rand::seq::SliceRandom;

use crate::achievements::{ladder, newly_reached, Achievement};
use crate::normalize::normalize_code;
use crate::progress::{Progress, ProgressStore};
use crate::vault::Vault;

/// Outcome of submitting a guess.
#[derive(Debug, Clone, PartialEq)]
pub enum Guess {
    Revealed {
        /// The normalized code that matched.
        code: String,
        entry: Entry,
        /// False when the code had been found before.
        newly_unlocked: bool,
        /// Milestones crossed by this unlock, in ladder order.
        achievements: Vec<Achievement>,
    },
    Unknown {
        /// Within edit distance 2 of some real code.
        near_miss: bool,
    },
}

/// A hint for a still-locked codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub text: String,
}

/// A player session over one vault and one progress store.
///
/// Progress is loaded once at construction and flushed through the store on
/// every mutation, so a crash never loses more than the in-flight guess.
pub struct Session<S: ProgressStore> {
    vault: Vault,
    store: S,
    progress: Progress,
    ladder: Vec<Achievement>,
}

impl<S: ProgressStore> Session<S> {
    pub fn new(vault: Vault, store: S) -> Result<Self> {
        let progress = store.load()?;
        let ladder = ladder(vault.len());
        Ok(Self {
            vault,
            store,
            progress,
            ladder,
        })
    }

    /// Submit a raw guess.
    pub fn submit(&mut self, raw: &str) -> Result<Guess> {
        let code = normalize_code(raw);
        if code.is_empty() {
            return Ok(Guess::Unknown { near_miss: false });
        }

        let Some(entry) = self.vault.get(&code) else {
            return Ok(Guess::Unknown {
                near_miss: self.vault.is_near_miss(&code),
            });
        };
        let entry = entry.clone();

        let newly_unlocked = self.progress.unlocked.insert(code.clone());
        let mut reached = Vec::new();
        if newly_unlocked {
            for achievement in newly_reached(
                &self.ladder,
                self.progress.unlocked.len(),
                &self.progress.achievements,
            ) {
                reached.push(achievement.clone());
            }
            for achievement in &reached {
                self.progress.achievements.insert(achievement.id.clone());
            }
            self.store.save(&self.progress)?;
            tracing::info!(code, unlocked = self.progress.unlocked.len(), "new secret unlocked");
        }

        Ok(Guess::Revealed {
            code,
            entry,
            newly_unlocked,
            achievements: reached,
        })
    }

    /// A hint for a random still-locked code: its authored hint text, or the
    /// code's first letter when none was written.
    pub fn hint(&self) -> Option<Hint> {
        let locked: Vec<&str> = self
            .vault
            .codes()
            .filter(|code| !self.progress.is_unlocked(code))
            .collect();

        let code = locked.choose(&mut rand::thread_rng())?;
        let text = match self.vault.get(code).and_then(Entry::hint_text) {
            Some(hint) => hint.to_string(),
            None => {
                let first = code.chars().next()?.to_uppercase();
                format!("The code starts with: {first}...")
            }
        };
        Some(Hint { text })
    }

    /// Toggle a favorite; returns the new state. Unknown codes are ignored.
    pub fn toggle_favorite(&mut self, raw: &str) -> Result<bool> {
        let code = normalize_code(raw);
        if !self.vault.contains(&code) {
            return Ok(false);
        }
        let now_favorite = if self.progress.favorites.remove(&code) {
            false
        } else {
            self.progress.favorites.insert(code);
            true
        };
        self.store.save(&self.progress)?;
        Ok(now_favorite)
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn unlocked_count(&self) -> usize {
        self.progress.unlocked.len()
    }

    pub fn total_count(&self) -> usize {
        self.vault.len()
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Serialize progress for transfer to another device.
    pub fn export_progress(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.progress)?)
    }

    /// Replace progress with an exported snapshot and persist it.
    pub fn import_progress(&mut self, json: &str) -> Result<()> {
        let imported: Progress = serde_json::from_str(json)?;
        self.progress = imported;
        self.store.save(&self.progress)?;
        Ok(())
    }

    /// Forget everything.
    pub fn reset(&mut self) -> Result<()> {
        self.progress = Progress::default();
        self.store.clear()
    }
}
