//! Puzzle generation by rejection sampling
//!
//! Draws [`PUZZLE_LENGTH`] independent uniform letters and keeps the first
//! draw from which some dictionary word can be formed. There is no iteration
//! cap: with any dictionary holding a short word the loop ends almost surely.
//! A dictionary that can never satisfy the loop is rejected up front.

use crate::dictionary::Dictionary;
use crate::puzzle::PUZZLE_LENGTH;
use rand::Rng;
use thiserror::Error;

/// Errors raised before sampling starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// No dictionary word fits in a puzzle, so no draw could ever succeed
    #[error("Dictionary has no word of at most {max_len} letters; cannot generate a solvable puzzle")]
    Unsatisfiable {
        /// Puzzle length that was required
        max_len: usize,
    },
}

/// Generates solvable puzzles from a dictionary
pub struct PuzzleGenerator<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> PuzzleGenerator<'a> {
    /// Create a generator over `dictionary`
    pub fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Generate a puzzle using the thread-local RNG
    pub fn generate(&self) -> Result<String, GenerationError> {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a puzzle using the given RNG
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Result<String, GenerationError> {
        if !self.dictionary.has_word_within(PUZZLE_LENGTH) {
            return Err(GenerationError::Unsatisfiable {
                max_len: PUZZLE_LENGTH,
            });
        }

        loop {
            let candidate: String = (0..PUZZLE_LENGTH)
                .map(|_| rng.gen_range(b'a'..=b'z') as char)
                .collect();

            if self.dictionary.any_word_formable_from(&candidate) {
                return Ok(candidate);
            }
        }
    }
}
