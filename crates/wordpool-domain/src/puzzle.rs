//! Puzzle module - a fixed pool of letters students draw words from

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of letters in every puzzle
pub const PUZZLE_LENGTH: usize = 14;

/// Storage-assigned puzzle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PuzzleId(pub i64);

impl fmt::Display for PuzzleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted puzzle
///
/// `letters` is always [`PUZZLE_LENGTH`] lowercase ASCII letters from which
/// at least one dictionary word could be formed when it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// Unique identifier
    pub id: PuzzleId,

    /// The letter pool
    pub letters: String,

    /// Creation time (seconds since Unix epoch)
    pub created_at: u64,
}

impl Puzzle {
    /// True if `letters` has the shape every puzzle must have
    pub fn is_well_formed(letters: &str) -> bool {
        letters.len() == PUZZLE_LENGTH && letters.chars().all(|c| c.is_ascii_lowercase())
    }
}
