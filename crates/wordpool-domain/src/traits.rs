//! Trait definitions for external interactions
//!
//! These traits define the boundary between the scoring engine and
//! persistence. Implementations live in other crates.

use crate::leaderboard::{LeaderboardEntry, OfferPlan};
use crate::puzzle::{Puzzle, PuzzleId};
use crate::student::{Student, StudentId};
use crate::submission::{NewSubmission, SubmissionRecord};

/// Trait for storing students, puzzles, submissions and the leaderboard
///
/// Implemented by the infrastructure layer (wordpool-store)
pub trait GameStore {
    /// Error type for store operations
    type Error;

    /// Register a new student
    fn create_student(&mut self, name: &str, created_at: u64) -> Result<Student, Self::Error>;

    /// Get a student by ID
    fn get_student(&self, id: StudentId) -> Result<Option<Student>, Self::Error>;

    /// List all students, oldest first
    fn list_students(&self) -> Result<Vec<Student>, Self::Error>;

    /// Rename a student; `None` if the student does not exist
    fn rename_student(&mut self, id: StudentId, name: &str) -> Result<Option<Student>, Self::Error>;

    /// Delete a student and their submissions; `false` if not found
    fn delete_student(&mut self, id: StudentId) -> Result<bool, Self::Error>;

    /// Persist a generated puzzle
    fn insert_puzzle(&mut self, letters: &str, created_at: u64) -> Result<Puzzle, Self::Error>;

    /// Get a puzzle by ID
    fn get_puzzle(&self, id: PuzzleId) -> Result<Option<Puzzle>, Self::Error>;

    /// Words previously accepted for this student on this puzzle
    fn accepted_words(&self, student: StudentId, puzzle: PuzzleId) -> Result<Vec<String>, Self::Error>;

    /// Atomically record an accepted submission and offer it to the leaderboard
    ///
    /// Either both the submission row and the leaderboard change are
    /// committed, or neither is.
    fn commit_submission(&mut self, submission: &NewSubmission) -> Result<OfferPlan, Self::Error>;

    /// Atomically offer a word to the leaderboard
    fn offer(&mut self, word: &str, score: u32) -> Result<OfferPlan, Self::Error>;

    /// Current leaderboard, best first
    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, Self::Error>;

    /// A student's submissions, newest first
    fn student_submissions(&self, student: StudentId) -> Result<Vec<SubmissionRecord>, Self::Error>;

    /// Sum of a student's accepted scores
    fn student_total_score(&self, student: StudentId) -> Result<u64, Self::Error>;
}
