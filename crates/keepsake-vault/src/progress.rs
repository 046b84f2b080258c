//! Player progress: unlocked codes, favorites, reached achievements.
//!
//! Persistence is an explicit, injectable interface rather than ambient
//! storage, so it can be swapped or tested with an in-memory fake. The JSON
//! backend flushes atomically via temp+rename.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Everything the player has discovered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub unlocked: BTreeSet<String>,
    pub favorites: BTreeSet<String>,
    pub achievements: BTreeSet<String>,
}

impl Progress {
    pub fn is_unlocked(&self, code: &str) -> bool {
        self.unlocked.contains(code)
    }
}

/// Pluggable persistence for [`Progress`].
pub trait ProgressStore {
    fn load(&self) -> Result<Progress>;
    fn save(&self, progress: &Progress) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

impl<T: ProgressStore + ?Sized> ProgressStore for &T {
    fn load(&self) -> Result<Progress> {
        (**self).load()
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        (**self).save(progress)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// JSON file backend.
///
/// A missing file loads as empty progress; saves create the parent
/// directory and write atomically (write temp, then rename).
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> Result<Progress> {
        if !self.path.exists() {
            return Ok(Progress::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading progress: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing progress: {}", self.path.display()))
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating progress dir: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(progress).context("serializing progress")?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, &json)
            .with_context(|| format!("writing progress temp: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("renaming progress: {}", self.path.display()))?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("removing progress: {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// In-memory fake for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    state: Mutex<Progress>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(progress: Progress) -> Self {
        Self {
            state: Mutex::new(progress),
        }
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<Progress> {
        Ok(self.state.lock().expect("progress store poisoned").clone())
    }

    fn save(&self, progress: &Progress) -> Result<()> {
        *self.state.lock().expect("progress store poisoned") = progress.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.state.lock().expect("progress store poisoned") = Progress::default();
        Ok(())
    }
}
