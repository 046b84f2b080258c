//! The content model: what a codeword reveals.
//!
//! Each variant carries only the fields it needs and is resolved by
//! exhaustive matching; there is no runtime `type` switch with fallthrough.

use serde::{Deserialize, Serialize};

/// One revealable piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// A plain message, rendered as-is.
    Text { body: String },

    /// An image shown inline.
    Image { path: String },

    /// An embedded video, with an optional caption shown above it.
    Video {
        embed_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },

    /// An external link opened in a new context.
    Link { url: String },

    /// A file offered as a save-to-disk action. Sealed downloads (`.enc` /
    /// `.wenc`, or explicitly flagged) route through the unlock pipeline.
    Download {
        url: String,
        /// Declared filename, advisory only; sanitized before saving.
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
        #[serde(default)]
        sealed: bool,
    },

    /// A sub-page within the gift site itself.
    Internal { page: String },
}

impl Content {
    /// Whether this content requires a passphrase to unwrap.
    pub fn is_sealed(&self) -> bool {
        match self {
            Content::Download { name, sealed, .. } => {
                *sealed || name.ends_with(".enc") || name.ends_with(".wenc")
            }
            _ => false,
        }
    }
}

/// A vault entry: content plus presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(flatten)]
    pub content: Content,

    /// Grouping label shown in the unlocked list (e.g. "Carta", "Cosplay").
    pub category: String,

    /// Hint text for the hint system; empty or absent means "no hint".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,

    /// Audio track to start when this entry is revealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl Entry {
    /// Hint text if one is actually authored (non-empty).
    pub fn hint_text(&self) -> Option<&str> {
        self.hint.as_deref().filter(|h| !h.trim().is_empty())
    }
}
