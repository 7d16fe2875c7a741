//! Integration tests for wordpool-store
//!
//! These tests verify the full lifecycle of students, puzzles, submissions
//! and the leaderboard against a real SQLite database.

use wordpool_domain::traits::GameStore;
use wordpool_domain::{LeaderboardEntry, NewSubmission, OfferPlan, PuzzleId, StudentId};
use wordpool_store::{SqliteStore, StoreError};

const PUZZLE: &str = "dgeftoikbvxuaa";

fn store_with_student_and_puzzle() -> (SqliteStore, StudentId, PuzzleId) {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let student = store.create_student("Test Student", 1000).unwrap();
    let puzzle = store.insert_puzzle(PUZZLE, 1000).unwrap();
    (store, student.id, puzzle.id)
}

fn submission(student_id: StudentId, puzzle_id: PuzzleId, word: &str, at: u64) -> NewSubmission {
    NewSubmission {
        student_id,
        puzzle_id,
        word: word.to_string(),
        score: word.len() as u32,
        created_at: at,
    }
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_student_crud() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let ada = store.create_student("Ada", 1000).unwrap();
    let bob = store.create_student("Bob", 1001).unwrap();
    assert_ne!(ada.id, bob.id);

    let fetched = store.get_student(ada.id).unwrap().unwrap();
    assert_eq!(fetched, ada);

    let renamed = store.rename_student(bob.id, "Robert").unwrap().unwrap();
    assert_eq!(renamed.name, "Robert");
    assert_eq!(renamed.created_at, 1001);

    let all = store.list_students().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Ada");

    assert!(store.delete_student(ada.id).unwrap());
    assert!(store.get_student(ada.id).unwrap().is_none());
    assert!(!store.delete_student(ada.id).unwrap());
}

#[test]
fn test_rename_missing_student() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    assert!(store.rename_student(StudentId(99), "Ghost").unwrap().is_none());
}

#[test]
fn test_insert_and_get_puzzle() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let puzzle = store.insert_puzzle(PUZZLE, 1234).unwrap();
    let fetched = store.get_puzzle(puzzle.id).unwrap().unwrap();
    assert_eq!(fetched.letters, PUZZLE);
    assert_eq!(fetched.created_at, 1234);

    assert!(store.get_puzzle(PuzzleId(999)).unwrap().is_none());
}

#[test]
fn test_malformed_puzzle_rejected() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let result = store.insert_puzzle("short", 1000);
    assert!(matches!(result, Err(StoreError::InvalidData(_))));
}

#[test]
fn test_commit_submission_records_history_and_leaderboard() {
    let (mut store, student, puzzle) = store_with_student_and_puzzle();

    let plan = store.commit_submission(&submission(student, puzzle, "get", 1001)).unwrap();
    assert_eq!(plan, OfferPlan::Insert);

    assert_eq!(store.accepted_words(student, puzzle).unwrap(), vec!["get"]);
    assert_eq!(store.leaderboard().unwrap(), vec![LeaderboardEntry::new("get", 3)]);
}

#[test]
fn test_accepted_words_scoped_to_student_and_puzzle() {
    let (mut store, student, puzzle) = store_with_student_and_puzzle();
    let other_student = store.create_student("Other", 1000).unwrap().id;
    let other_puzzle = store.insert_puzzle("aabbccddeeffgg", 1000).unwrap().id;

    store.commit_submission(&submission(student, puzzle, "get", 1001)).unwrap();
    store.commit_submission(&submission(other_student, puzzle, "fox", 1002)).unwrap();
    store.commit_submission(&submission(student, other_puzzle, "bad", 1003)).unwrap();

    assert_eq!(store.accepted_words(student, puzzle).unwrap(), vec!["get"]);
    assert_eq!(store.accepted_words(other_student, puzzle).unwrap(), vec!["fox"]);
    assert_eq!(store.accepted_words(student, other_puzzle).unwrap(), vec!["bad"]);
}

#[test]
fn test_failed_submission_rolls_back_leaderboard() {
    let (mut store, _student, puzzle) = store_with_student_and_puzzle();

    // unknown student violates the foreign key before the offer runs
    let result = store.commit_submission(&submission(StudentId(999), puzzle, "get", 1001));
    assert!(matches!(result, Err(StoreError::Database(_))));

    assert!(store.leaderboard().unwrap().is_empty());
    assert!(store.accepted_words(StudentId(999), puzzle).unwrap().is_empty());
}

#[test]
fn test_leaderboard_keeps_top_ten() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    for i in 1..=15u32 {
        store.offer(&format!("word{:02}", i), i).unwrap();
    }

    let top = store.leaderboard().unwrap();
    assert_eq!(top.len(), 10);

    let scores: Vec<u32> = top.iter().map(|e| e.score).collect();
    assert_eq!(scores, (6..=15).rev().collect::<Vec<u32>>());

    for i in 1..=5 {
        let word = format!("word{:02}", i);
        assert!(top.iter().all(|e| e.word != word), "{} should be evicted", word);
    }
}

#[test]
fn test_leaderboard_no_downgrade() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    assert_eq!(store.offer("fox", 5).unwrap(), OfferPlan::Insert);
    assert_eq!(store.offer("fox", 2).unwrap(), OfferPlan::Keep);
    assert_eq!(store.leaderboard().unwrap(), vec![LeaderboardEntry::new("fox", 5)]);

    assert_eq!(store.offer("fox", 7).unwrap(), OfferPlan::Raise { from: 5 });
    assert_eq!(store.leaderboard().unwrap(), vec![LeaderboardEntry::new("fox", 7)]);
}

#[test]
fn test_leaderboard_full_table_ignores_low_scores() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    for i in 0..10u32 {
        store.offer(&format!("word{}", i), 5 + i).unwrap();
    }

    assert_eq!(store.offer("tiny", 5).unwrap(), OfferPlan::Keep);
    assert_eq!(
        store.offer("big", 6).unwrap(),
        OfferPlan::Replace {
            evicted: LeaderboardEntry::new("word0", 5)
        }
    );

    let top = store.leaderboard().unwrap();
    assert_eq!(top.len(), 10);
    assert!(top.iter().any(|e| e.word == "big"));
    assert!(top.iter().all(|e| e.word != "tiny" && e.word != "word0"));
}

#[test]
fn test_student_submissions_newest_first() {
    let (mut store, student, puzzle) = store_with_student_and_puzzle();

    store.commit_submission(&submission(student, puzzle, "get", 1001)).unwrap();
    store.commit_submission(&submission(student, puzzle, "fox", 1002)).unwrap();

    let history = store.student_submissions(student).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].word, "fox");
    assert_eq!(history[1].word, "get");
    assert_eq!(history[0].puzzle_letters, PUZZLE);

    assert_eq!(store.student_total_score(student).unwrap(), 6);
}

#[test]
fn test_total_score_of_new_student_is_zero() {
    let (store, student, _puzzle) = store_with_student_and_puzzle();
    assert_eq!(store.student_total_score(student).unwrap(), 0);
}

#[test]
fn test_delete_student_cascades_submissions() {
    let (mut store, student, puzzle) = store_with_student_and_puzzle();
    store.commit_submission(&submission(student, puzzle, "get", 1001)).unwrap();

    assert!(store.delete_student(student).unwrap());
    assert!(store.accepted_words(student, puzzle).unwrap().is_empty());

    // the leaderboard is global and outlives the student
    assert_eq!(store.leaderboard().unwrap().len(), 1);
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wordpool.db");

    let (student, puzzle) = {
        let mut store = SqliteStore::new(&path).unwrap();
        let student = store.create_student("Ada", 1000).unwrap().id;
        let puzzle = store.insert_puzzle(PUZZLE, 1000).unwrap().id;
        store.commit_submission(&submission(student, puzzle, "get", 1001)).unwrap();
        (student, puzzle)
    };

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.accepted_words(student, puzzle).unwrap(), vec!["get"]);
    assert_eq!(store.leaderboard().unwrap(), vec![LeaderboardEntry::new("get", 3)]);
}
