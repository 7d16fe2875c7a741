//! Wordpool Storage Layer
//!
//! Implements the GameStore trait on SQLite.
//!
//! # Architecture
//!
//! - `students`, `puzzles` and `submissions` hold the game history
//! - `leaderboard` holds at most ten rows, maintained by the offer transaction
//! - Accepted submissions and their leaderboard offer commit together
//!
//! # Examples
//!
//! ```no_run
//! use wordpool_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for game operations
//! ```

#![warn(missing_docs)]

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use wordpool_domain::leaderboard::{plan_offer, rank, LEADERBOARD_CAPACITY};
use wordpool_domain::traits::GameStore;
use wordpool_domain::{
    current_timestamp, LeaderboardEntry, NewSubmission, OfferPlan, Puzzle, PuzzleId, Student,
    StudentId, SubmissionRecord,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of GameStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share one store behind a mutex;
/// holding that mutex across an offer is what serializes leaderboard updates.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wordpool_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("wordpool.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
        Ok(Student {
            id: StudentId(row.get(0)?),
            name: row.get(1)?,
            created_at: row.get::<_, i64>(2)? as u64,
        })
    }

    fn row_to_puzzle(row: &Row<'_>) -> rusqlite::Result<Puzzle> {
        Ok(Puzzle {
            id: PuzzleId(row.get(0)?),
            letters: row.get(1)?,
            created_at: row.get::<_, i64>(2)? as u64,
        })
    }

    /// Read every leaderboard row (unordered)
    fn read_leaderboard(conn: &Connection) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let mut stmt = conn.prepare("SELECT word, score FROM leaderboard")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(LeaderboardEntry {
                    word: row.get(0)?,
                    score: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Plan and apply an offer on `conn`
    ///
    /// Must run inside a transaction so the snapshot and the write agree.
    fn apply_offer(
        conn: &Connection,
        word: &str,
        score: u32,
        now: u64,
    ) -> Result<OfferPlan, StoreError> {
        let entries = Self::read_leaderboard(conn)?;
        let plan = plan_offer(&entries, word, score);

        match &plan {
            OfferPlan::Insert => {
                conn.execute(
                    "INSERT INTO leaderboard (word, score, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)",
                    params![word, score, now as i64],
                )?;
            }
            OfferPlan::Raise { from } => {
                conn.execute(
                    "UPDATE leaderboard SET score = ?1, updated_at = ?2 WHERE word = ?3",
                    params![score, now as i64, word],
                )?;
                tracing::debug!("Leaderboard: raised '{}' from {} to {}", word, from, score);
            }
            OfferPlan::Replace { evicted } => {
                conn.execute(
                    "DELETE FROM leaderboard WHERE word = ?1",
                    params![&evicted.word],
                )?;
                conn.execute(
                    "INSERT INTO leaderboard (word, score, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)",
                    params![word, score, now as i64],
                )?;
                tracing::debug!(
                    "Leaderboard: '{}' ({}) evicted by '{}' ({})",
                    evicted.word,
                    evicted.score,
                    word,
                    score
                );
            }
            OfferPlan::Keep => {}
        }

        Ok(plan)
    }
}

impl GameStore for SqliteStore {
    type Error = StoreError;

    fn create_student(&mut self, name: &str, created_at: u64) -> Result<Student, Self::Error> {
        self.conn.execute(
            "INSERT INTO students (name, created_at) VALUES (?1, ?2)",
            params![name, created_at as i64],
        )?;

        Ok(Student {
            id: StudentId(self.conn.last_insert_rowid()),
            name: name.to_string(),
            created_at,
        })
    }

    fn get_student(&self, id: StudentId) -> Result<Option<Student>, Self::Error> {
        let student = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM students WHERE id = ?1",
                params![id.0],
                Self::row_to_student,
            )
            .optional()?;
        Ok(student)
    }

    fn list_students(&self) -> Result<Vec<Student>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM students ORDER BY id")?;
        let students = stmt
            .query_map([], Self::row_to_student)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(students)
    }

    fn rename_student(&mut self, id: StudentId, name: &str) -> Result<Option<Student>, Self::Error> {
        let changed = self.conn.execute(
            "UPDATE students SET name = ?1 WHERE id = ?2",
            params![name, id.0],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        self.get_student(id)
    }

    fn delete_student(&mut self, id: StudentId) -> Result<bool, Self::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", params![id.0])?;
        Ok(changed > 0)
    }

    fn insert_puzzle(&mut self, letters: &str, created_at: u64) -> Result<Puzzle, Self::Error> {
        if !Puzzle::is_well_formed(letters) {
            return Err(StoreError::InvalidData(format!(
                "Puzzle letters must be 14 lowercase letters, got '{}'",
                letters
            )));
        }

        self.conn.execute(
            "INSERT INTO puzzles (letters, created_at) VALUES (?1, ?2)",
            params![letters, created_at as i64],
        )?;

        Ok(Puzzle {
            id: PuzzleId(self.conn.last_insert_rowid()),
            letters: letters.to_string(),
            created_at,
        })
    }

    fn get_puzzle(&self, id: PuzzleId) -> Result<Option<Puzzle>, Self::Error> {
        let puzzle = self
            .conn
            .query_row(
                "SELECT id, letters, created_at FROM puzzles WHERE id = ?1",
                params![id.0],
                Self::row_to_puzzle,
            )
            .optional()?;
        Ok(puzzle)
    }

    fn accepted_words(&self, student: StudentId, puzzle: PuzzleId) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT word FROM submissions WHERE student_id = ?1 AND puzzle_id = ?2 ORDER BY id",
        )?;
        let words = stmt
            .query_map(params![student.0, puzzle.0], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(words)
    }

    fn commit_submission(&mut self, submission: &NewSubmission) -> Result<OfferPlan, Self::Error> {
        // Dropping the transaction on any early return rolls both steps back
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO submissions (student_id, puzzle_id, word, score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                submission.student_id.0,
                submission.puzzle_id.0,
                &submission.word,
                submission.score,
                submission.created_at as i64,
            ],
        )?;

        let plan = Self::apply_offer(&tx, &submission.word, submission.score, submission.created_at)?;
        tx.commit()?;

        Ok(plan)
    }

    fn offer(&mut self, word: &str, score: u32) -> Result<OfferPlan, Self::Error> {
        let tx = self.conn.transaction()?;
        let plan = Self::apply_offer(&tx, word, score, current_timestamp())?;
        tx.commit()?;
        Ok(plan)
    }

    fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, Self::Error> {
        let mut entries = Self::read_leaderboard(&self.conn)?;
        rank(&mut entries);
        entries.truncate(LEADERBOARD_CAPACITY);
        Ok(entries)
    }

    fn student_submissions(&self, student: StudentId) -> Result<Vec<SubmissionRecord>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.student_id, s.puzzle_id, s.word, s.score, p.letters, s.created_at
             FROM submissions s JOIN puzzles p ON p.id = s.puzzle_id
             WHERE s.student_id = ?1
             ORDER BY s.created_at DESC, s.id DESC",
        )?;

        let records = stmt
            .query_map(params![student.0], |row| {
                Ok(SubmissionRecord {
                    id: row.get(0)?,
                    student_id: StudentId(row.get(1)?),
                    puzzle_id: PuzzleId(row.get(2)?),
                    word: row.get(3)?,
                    score: row.get(4)?,
                    puzzle_letters: row.get(5)?,
                    created_at: row.get::<_, i64>(6)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn student_total_score(&self, student: StudentId) -> Result<u64, Self::Error> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(score), 0) FROM submissions WHERE student_id = ?1",
            params![student.0],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }
}
