//! keepsake-unlock: fetch a sealed blob and unwrap it with a passphrase.
//!
//! One decrypt operation runs to completion (or failure) before its result is
//! used; there is no shared mutable state between calls, no retry loop, and
//! no background work after the caller drops the future. The derived key is
//! scoped to the single call.

pub mod fetch;
pub mod unlocker;

pub use fetch::BlobFetcher;
pub use unlocker::{sanitize_filename, Unlocked, Unlocker};
