//! Game service
//!
//! Ties the dictionary, the store and the leaderboard cache together. Every
//! operation that reads history and then writes runs under one store lock,
//! so a student's remaining letters and the leaderboard's minimum are never
//! read stale by a concurrent submission.

use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use wordpool_domain::traits::GameStore;
use wordpool_domain::{
    current_timestamp, Decision, Dictionary, GenerationError, LeaderboardEntry, NewSubmission,
    OfferPlan, Puzzle, PuzzleGenerator, PuzzleId, ScoreCache, Student, StudentId,
    SubmissionRecord, SubmissionValidator,
};

/// Errors surfaced by the game service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The underlying store failed
    #[error("Store error: {0}")]
    Store(String),

    /// No puzzle with this id
    #[error("Puzzle not found: {0}")]
    PuzzleNotFound(PuzzleId),

    /// No student with this id
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    /// Puzzle generation is impossible with the loaded dictionary
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,
}

fn store_error<E: Display>(e: E) -> ServiceError {
    tracing::error!("Store operation failed: {}", e);
    ServiceError::Store(e.to_string())
}

/// Word-puzzle game service over any [`GameStore`]
pub struct GameService<S: GameStore> {
    store: Mutex<S>,
    dictionary: Arc<Dictionary>,
    cache: ScoreCache,
}

impl<S> GameService<S>
where
    S: GameStore,
    S::Error: Display,
{
    /// Create a service; `cache_ttl` bounds how long a leaderboard listing is reused
    pub fn new(store: S, dictionary: Arc<Dictionary>, cache_ttl: Duration) -> Self {
        Self {
            store: Mutex::new(store),
            dictionary,
            cache: ScoreCache::new(cache_ttl),
        }
    }

    /// The loaded dictionary
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, ServiceError> {
        self.store.lock().map_err(|_| ServiceError::LockPoisoned)
    }

    /// Generate and persist a new puzzle
    pub fn generate_puzzle(&self) -> Result<Puzzle, ServiceError> {
        let letters = PuzzleGenerator::new(&self.dictionary).generate()?;

        let mut store = self.lock()?;
        let puzzle = store
            .insert_puzzle(&letters, current_timestamp())
            .map_err(store_error)?;

        info!("Generated puzzle {} ({})", puzzle.id, puzzle.letters);
        Ok(puzzle)
    }

    /// Every dictionary word formable from the full puzzle
    pub fn valid_words(&self, puzzle_id: PuzzleId) -> Result<Vec<String>, ServiceError> {
        let puzzle = {
            let store = self.lock()?;
            store.get_puzzle(puzzle_id).map_err(store_error)?
        }
        .ok_or(ServiceError::PuzzleNotFound(puzzle_id))?;

        Ok(self.dictionary.valid_words(&puzzle.letters))
    }

    /// Validate a word against the student's history on the puzzle and,
    /// if accepted, record it and offer it to the leaderboard
    ///
    /// Rejections are returned as [`Decision::Rejected`], not as errors.
    pub fn submit_word(
        &self,
        student_id: StudentId,
        puzzle_id: PuzzleId,
        word: &str,
    ) -> Result<Decision, ServiceError> {
        let mut store = self.lock()?;

        if store.get_student(student_id).map_err(store_error)?.is_none() {
            return Err(ServiceError::StudentNotFound(student_id));
        }
        let puzzle = store
            .get_puzzle(puzzle_id)
            .map_err(store_error)?
            .ok_or(ServiceError::PuzzleNotFound(puzzle_id))?;

        let prior = store
            .accepted_words(student_id, puzzle_id)
            .map_err(store_error)?;

        let decision = SubmissionValidator::new(&self.dictionary).evaluate(&puzzle.letters, &prior, word);

        match &decision {
            Decision::Accepted(acceptance) => {
                let submission = NewSubmission {
                    student_id,
                    puzzle_id,
                    word: word.to_string(),
                    score: acceptance.score,
                    created_at: current_timestamp(),
                };
                let plan = store.commit_submission(&submission).map_err(store_error)?;
                if plan.mutates() {
                    self.cache.invalidate();
                }

                info!(
                    "Student {} scored {} with '{}' on puzzle {}",
                    student_id, acceptance.score, word, puzzle_id
                );
            }
            Decision::Rejected(reason) => {
                debug!(
                    "Student {} submission '{}' on puzzle {} rejected: {}",
                    student_id, word, puzzle_id, reason
                );
            }
        }

        Ok(decision)
    }

    /// Offer a word directly to the leaderboard
    pub fn offer(&self, word: &str, score: u32) -> Result<OfferPlan, ServiceError> {
        let mut store = self.lock()?;
        let plan = store.offer(word, score).map_err(store_error)?;
        if plan.mutates() {
            self.cache.invalidate();
        }
        Ok(plan)
    }

    /// Leaderboard listing, best first, served from cache while fresh
    pub fn top_scores(&self) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        if let Some(entries) = self.cache.get() {
            return Ok(entries);
        }

        // Refill under the store lock so an offer cannot slip in between
        // the read and the put.
        let store = self.lock()?;
        let entries = store.leaderboard().map_err(store_error)?;
        self.cache.put(entries.clone());
        Ok(entries)
    }

    /// Register a student
    pub fn create_student(&self, name: &str) -> Result<Student, ServiceError> {
        let mut store = self.lock()?;
        let student = store
            .create_student(name, current_timestamp())
            .map_err(store_error)?;
        info!("Created student {} ({})", student.id, student.name);
        Ok(student)
    }

    /// All students
    pub fn list_students(&self) -> Result<Vec<Student>, ServiceError> {
        self.lock()?.list_students().map_err(store_error)
    }

    /// One student
    pub fn get_student(&self, id: StudentId) -> Result<Student, ServiceError> {
        self.lock()?
            .get_student(id)
            .map_err(store_error)?
            .ok_or(ServiceError::StudentNotFound(id))
    }

    /// Rename a student
    pub fn rename_student(&self, id: StudentId, name: &str) -> Result<Student, ServiceError> {
        self.lock()?
            .rename_student(id, name)
            .map_err(store_error)?
            .ok_or(ServiceError::StudentNotFound(id))
    }

    /// Delete a student and their submission history
    pub fn delete_student(&self, id: StudentId) -> Result<(), ServiceError> {
        if !self.lock()?.delete_student(id).map_err(store_error)? {
            return Err(ServiceError::StudentNotFound(id));
        }
        info!("Deleted student {}", id);
        Ok(())
    }

    /// True if the student exists
    pub fn student_exists(&self, id: StudentId) -> Result<bool, ServiceError> {
        Ok(self.lock()?.get_student(id).map_err(store_error)?.is_some())
    }

    /// True if the puzzle exists
    pub fn puzzle_exists(&self, id: PuzzleId) -> Result<bool, ServiceError> {
        Ok(self.lock()?.get_puzzle(id).map_err(store_error)?.is_some())
    }

    /// A student's submissions, newest first
    pub fn student_submissions(&self, id: StudentId) -> Result<Vec<SubmissionRecord>, ServiceError> {
        let store = self.lock()?;
        if store.get_student(id).map_err(store_error)?.is_none() {
            return Err(ServiceError::StudentNotFound(id));
        }
        store.student_submissions(id).map_err(store_error)
    }

    /// Sum of a student's accepted scores
    pub fn student_total_score(&self, id: StudentId) -> Result<u64, ServiceError> {
        let store = self.lock()?;
        if store.get_student(id).map_err(store_error)?.is_none() {
            return Err(ServiceError::StudentNotFound(id));
        }
        store.student_total_score(id).map_err(store_error)
    }
}
