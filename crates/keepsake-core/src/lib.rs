//! keepsake-core: types shared across the keepsake workspace
//!
//! - [`error`]: the unlock outcome taxonomy (authentication vs retrieval)
//! - [`config`]: `keepsake.toml` configuration with serde defaults
//! - [`content`]: the content model revealed by codewords

pub mod config;
pub mod content;
pub mod error;

pub use config::KeepsakeConfig;
pub use content::{Content, Entry};
pub use error::{RetrievalError, UnlockError};
