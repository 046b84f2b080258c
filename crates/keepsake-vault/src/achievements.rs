//! Unlock-count achievements.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A milestone reached by unlocking enough secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    /// Unlock count at which this fires.
    pub threshold: usize,
    pub message: String,
}

/// The fixed milestone ladder, with the last rung pinned to the vault size.
pub fn ladder(total_codes: usize) -> Vec<Achievement> {
    let mut rungs = vec![
        rung("first-secret", 1, "First secret unlocked! Many more are waiting."),
        rung("five-secrets", 5, "Five secrets revealed! You are quite the explorer."),
        rung("ten-secrets", 10, "Ten secrets! Your curiosity knows no limits."),
        rung("twenty-secrets", 20, "Twenty secrets! You are discovering my whole world."),
        rung("halfway-there", 40, "Amazing! So many memories unlocked..."),
        rung("almost-everything", 70, "Wow! You are an expert at uncovering my secrets."),
    ];
    rungs.retain(|a| a.threshold < total_codes);
    rungs.push(rung(
        "every-secret",
        total_codes,
        "Every secret unlocked! You are my everything.",
    ));
    rungs
}

fn rung(id: &str, threshold: usize, message: &str) -> Achievement {
    Achievement {
        id: id.into(),
        threshold,
        message: message.into(),
    }
}

/// Milestones whose threshold is now met but were not yet announced.
pub fn newly_reached<'a>(
    ladder: &'a [Achievement],
    unlocked_count: usize,
    already: &BTreeSet<String>,
) -> Vec<&'a Achievement> {
    ladder
        .iter()
        .filter(|a| a.threshold <= unlocked_count && !already.contains(&a.id))
        .collect()
}
