//! Submission validation and scoring
//!
//! A student's progress on a puzzle is never stored as a cursor. It is
//! rebuilt on every call from the words they already had accepted, so the
//! submission history stays the single record of truth.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Duplicate: exact, case-sensitive match against prior accepted words
//! 2. Dictionary: case-insensitive membership
//! 3. Availability: the word's letters must fit in what the prior words left
//!
//! The duplicate check deliberately compares raw strings while the other two
//! normalize case, so `"Get"` after `"get"` passes the duplicate check and is
//! then judged on letter availability alone.

use crate::dictionary::Dictionary;
use crate::letters::LetterMultiset;
use crate::puzzle::PuzzleId;
use crate::student::StudentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message returned with every accepted word
pub const ACCEPTED_MESSAGE: &str = "Word submitted successfully!";

/// Why a word was turned down
///
/// Rejections are normal outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// The exact string was already accepted for this student and puzzle
    AlreadySubmitted,

    /// The word is not in the dictionary
    NotInDictionary,

    /// The remaining letters cannot spell the word
    InsufficientLetters,
}

impl RejectionReason {
    /// Human-readable reason shown to the student
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::AlreadySubmitted => "Word already submitted.",
            RejectionReason::NotInDictionary => "Not a valid English word.",
            RejectionReason::InsufficientLetters => "Word cannot be formed from remaining letters.",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Details of an accepted word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    /// One point per letter
    pub score: u32,

    /// Puzzle letters left after all accepted words, in puzzle order
    pub remaining_letters: String,

    /// Every dictionary word still formable from `remaining_letters`
    pub remaining_words: Vec<String>,
}

/// Outcome of validating one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The word is accepted and must be persisted by the caller
    Accepted(Acceptance),

    /// The word is rejected; nothing is persisted
    Rejected(RejectionReason),
}

impl Decision {
    /// True for [`Decision::Accepted`]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted(_))
    }

    /// Student-facing message for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            Decision::Accepted(_) => ACCEPTED_MESSAGE,
            Decision::Rejected(reason) => reason.message(),
        }
    }
}

/// Score for an accepted word
pub fn score_word(word: &str) -> u32 {
    word.chars().count() as u32
}

/// Validates words against a puzzle and a student's history on it
///
/// # Examples
///
/// ```
/// use wordpool_domain::{Decision, Dictionary, SubmissionValidator};
///
/// let dictionary = Dictionary::from_words(["get", "fox", "over"]).unwrap();
/// let validator = SubmissionValidator::new(&dictionary);
///
/// let decision = validator.evaluate("dgeftoikbvxuaa", &[] as &[String], "get");
/// match decision {
///     Decision::Accepted(acceptance) => {
///         assert_eq!(acceptance.score, 3);
///         assert_eq!(acceptance.remaining_letters, "dfoikbvxuaa");
///     }
///     Decision::Rejected(reason) => panic!("unexpected rejection: {}", reason),
/// }
/// ```
pub struct SubmissionValidator<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> SubmissionValidator<'a> {
    /// Create a validator backed by `dictionary`
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Decide whether `word` is accepted
    ///
    /// `prior_words` are the words previously accepted for this student on
    /// this puzzle, in any order.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        puzzle_letters: &str,
        prior_words: &[S],
        word: &str,
    ) -> Decision {
        if prior_words.iter().any(|prior| prior.as_ref() == word) {
            return Decision::Rejected(RejectionReason::AlreadySubmitted);
        }

        if !self.dictionary.contains(word) {
            return Decision::Rejected(RejectionReason::NotInDictionary);
        }

        let consumed = LetterMultiset::from_words(prior_words);
        let available = LetterMultiset::from_letters(puzzle_letters).minus(&consumed);
        let wanted = LetterMultiset::from_letters(word);
        if !available.contains(&wanted) {
            return Decision::Rejected(RejectionReason::InsufficientLetters);
        }

        let remaining = available.minus(&wanted);
        let used_after = LetterMultiset::from_words(
            prior_words.iter().map(|prior| prior.as_ref()).chain(std::iter::once(word)),
        );

        Decision::Accepted(Acceptance {
            score: score_word(word),
            remaining_letters: used_after.remove_from(puzzle_letters),
            remaining_words: self
                .dictionary
                .all_words_formable_from(&remaining)
                .map(str::to_string)
                .collect(),
        })
    }
}

/// An accepted submission ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    /// Submitting student
    pub student_id: StudentId,

    /// Puzzle the word was drawn from
    pub puzzle_id: PuzzleId,

    /// The word exactly as submitted
    pub word: String,

    /// Score awarded
    pub score: u32,

    /// Submission time (seconds since Unix epoch)
    pub created_at: u64,
}

/// A persisted submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Storage-assigned identifier
    pub id: i64,

    /// Submitting student
    pub student_id: StudentId,

    /// Puzzle the word was drawn from
    pub puzzle_id: PuzzleId,

    /// The word exactly as submitted
    pub word: String,

    /// Score awarded
    pub score: u32,

    /// Letters of the puzzle, for history listings
    pub puzzle_letters: String,

    /// Submission time (seconds since Unix epoch)
    pub created_at: u64,
}
