//! Wordpool Domain Layer
//!
//! This crate contains the scoring engine and domain model for Wordpool,
//! a word-puzzle game. It defines the value types, the pure validation
//! logic, and the trait interfaces the storage layer implements.
//!
//! ## Key Concepts
//!
//! - **Dictionary**: Immutable lowercase word list, loaded once
//! - **LetterMultiset**: Per-letter histogram used for anagram-subset matching
//! - **Puzzle**: 14 random letters guaranteed to spell at least one word
//! - **Submission**: A word drawn from a puzzle's remaining letters
//! - **Leaderboard**: The ten best-scoring distinct words ever accepted
//!
//! ## Architecture
//!
//! - Pure business logic only; no I/O beyond loading the word list
//! - Per-student puzzle state is rebuilt from submission history on demand
//! - Persistence is reached through [`traits::GameStore`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod dictionary;
pub mod generator;
pub mod leaderboard;
pub mod letters;
pub mod puzzle;
pub mod student;
pub mod submission;
pub mod traits;

// Re-exports for convenience
pub use clock::current_timestamp;
pub use dictionary::{Dictionary, DictionaryError};
pub use generator::{GenerationError, PuzzleGenerator};
pub use leaderboard::{LeaderboardEntry, OfferPlan, ScoreCache, LEADERBOARD_CAPACITY};
pub use letters::LetterMultiset;
pub use puzzle::{Puzzle, PuzzleId, PUZZLE_LENGTH};
pub use student::{Student, StudentId};
pub use submission::{
    Acceptance, Decision, NewSubmission, RejectionReason, SubmissionRecord, SubmissionValidator,
};
