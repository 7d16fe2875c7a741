//! Student module - the players submitting words

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted student name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Storage-assigned student identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier
    pub id: StudentId,

    /// Display name
    pub name: String,

    /// Registration time (seconds since Unix epoch)
    pub created_at: u64,
}

/// Check a proposed student name, returning the problem if any
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("The name field is required.".to_string());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "The name may not be greater than {} characters.",
            MAX_NAME_LENGTH
        ));
    }
    Ok(())
}
