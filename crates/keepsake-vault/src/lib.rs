//! keepsake-vault: the codeword side of the gift site.
//!
//! A [`Vault`] maps normalized codewords to content entries. A
//! [`Session`] drives guesses against it, tracking unlocked codes,
//! favorites, and achievements through an injectable [`ProgressStore`].

pub mod achievements;
pub mod normalize;
pub mod progress;
pub mod session;
pub mod vault;

pub use achievements::Achievement;
pub use normalize::{levenshtein, normalize_code};
pub use progress::{JsonProgressStore, MemoryProgressStore, Progress, ProgressStore};
pub use session::{Guess, Hint, Session};
pub use vault::Vault;
