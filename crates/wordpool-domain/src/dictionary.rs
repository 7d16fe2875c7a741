//! Dictionary module - the immutable word list every puzzle is checked against

use crate::letters::LetterMultiset;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Shortest word a student may submit
pub const MIN_WORD_LENGTH: usize = 2;

/// Longest word a student may submit (one full puzzle)
pub const MAX_WORD_LENGTH: usize = 14;

/// Errors raised while loading a word list
///
/// All of these are startup-fatal: a process without a dictionary must not
/// serve traffic.
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Word list file could not be read
    #[error("Word list file not found at {path}: {source}")]
    Io {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Word list is not valid JSON
    #[error("Invalid word list JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON document has no `words` array
    #[error("Invalid word list format: expected a `words` array")]
    MissingWordList,

    /// An element of `words` is not a string
    #[error("Invalid word list format: entry {index} is not a string")]
    NonStringEntry {
        /// Position of the offending entry
        index: usize,
    },

    /// A word is not 2-14 ASCII letters
    #[error("Invalid dictionary word '{word}': {reason}")]
    InvalidEntry {
        /// The offending word (already lowercased)
        word: String,
        /// What is wrong with it
        reason: String,
    },
}

#[derive(Debug, Clone)]
struct Entry {
    word: String,
    letters: LetterMultiset,
}

/// Normalized, immutable word list
///
/// Words are lowercased on load and kept in source order with duplicates
/// collapsed. Each word's letter multiset is computed once so formability
/// queries never re-count.
///
/// # Examples
///
/// ```
/// use wordpool_domain::Dictionary;
///
/// let dictionary = Dictionary::from_words(["Fox", "get", "over"]).unwrap();
/// assert!(dictionary.contains("FOX"));
/// assert!(dictionary.any_word_formable_from("dgeftoikbvxuaa"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<Entry>,
    index: HashSet<String>,
}

impl Dictionary {
    /// Build a dictionary from in-memory words
    pub fn from_words<I, S>(words: I) -> Result<Self, DictionaryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::default();
        for word in words {
            dictionary.push(word.as_ref())?;
        }
        Ok(dictionary)
    }

    /// Parse a `{"words": [...]}` JSON document
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let data: Value = serde_json::from_str(json)?;
        let words = data
            .get("words")
            .and_then(Value::as_array)
            .ok_or(DictionaryError::MissingWordList)?;

        let mut dictionary = Self::default();
        for (index, value) in words.iter().enumerate() {
            let word = value
                .as_str()
                .ok_or(DictionaryError::NonStringEntry { index })?;
            dictionary.push(word)?;
        }
        Ok(dictionary)
    }

    /// Load a JSON word list from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    fn push(&mut self, raw: &str) -> Result<(), DictionaryError> {
        let word = raw.trim().to_lowercase();
        let len = word.chars().count();

        if !word.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(DictionaryError::InvalidEntry {
                word,
                reason: "only letters a-z are allowed".to_string(),
            });
        }
        if !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&len) {
            return Err(DictionaryError::InvalidEntry {
                word,
                reason: format!(
                    "length {} is outside {}-{}",
                    len, MIN_WORD_LENGTH, MAX_WORD_LENGTH
                ),
            });
        }

        if self.index.insert(word.clone()) {
            let letters = LetterMultiset::from_letters(&word);
            self.entries.push(Entry { word, letters });
        }
        Ok(())
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the dictionary holds no words
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive exact membership
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(&word.to_lowercase())
    }

    /// True if some word of at most `max_len` letters exists
    pub fn has_word_within(&self, max_len: usize) -> bool {
        self.entries.iter().any(|e| e.letters.len() <= max_len)
    }

    /// True if at least one word can be drawn from `letters`
    pub fn any_word_formable_from(&self, letters: &str) -> bool {
        self.all_words_formable_from(&LetterMultiset::from_letters(letters))
            .next()
            .is_some()
    }

    /// Every word whose letters are contained in `pool`
    ///
    /// The returned iterator is lazy and can be cloned to restart the scan.
    pub fn all_words_formable_from(&self, pool: &LetterMultiset) -> FormableWords<'_> {
        FormableWords {
            entries: self.entries.iter(),
            pool: *pool,
            pool_len: pool.len(),
        }
    }

    /// Collect every word formable from a letter string
    pub fn valid_words(&self, letters: &str) -> Vec<String> {
        self.all_words_formable_from(&LetterMultiset::from_letters(letters))
            .map(str::to_string)
            .collect()
    }
}

/// Iterator over the dictionary words formable from a letter pool
#[derive(Debug, Clone)]
pub struct FormableWords<'a> {
    entries: std::slice::Iter<'a, Entry>,
    pool: LetterMultiset,
    pool_len: usize,
}

impl<'a> Iterator for FormableWords<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let pool = &self.pool;
        let pool_len = self.pool_len;
        self.entries
            .by_ref()
            .filter(|e| e.letters.len() <= pool_len)
            .find(|e| pool.contains(&e.letters))
            .map(|e| e.word.as_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.entries.size_hint().1)
    }
}
