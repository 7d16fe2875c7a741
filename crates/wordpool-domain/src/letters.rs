//! Letter multiset module - 26-letter histograms for anagram-subset matching

use std::fmt;

/// Number of letters in the supported alphabet (ASCII a-z)
pub const ALPHABET_SIZE: usize = 26;

/// A count per letter of the alphabet
///
/// Built from a string by lowercasing and counting each `a`-`z` occurrence.
/// Characters outside `a`-`z` are ignored. Counts never go negative:
/// [`minus`](Self::minus) clamps at zero.
///
/// # Examples
///
/// ```
/// use wordpool_domain::LetterMultiset;
///
/// let pool = LetterMultiset::from_letters("dgeftoikbvxuaa");
/// assert!(pool.contains(&LetterMultiset::from_letters("fox")));
/// assert!(!pool.contains(&LetterMultiset::from_letters("over")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LetterMultiset {
    counts: [u32; ALPHABET_SIZE],
}

fn slot(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    c.is_ascii_lowercase().then(|| (c as u8 - b'a') as usize)
}

impl LetterMultiset {
    /// Create an empty multiset
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the letters of a string, normalizing case first
    pub fn from_letters(letters: &str) -> Self {
        let mut counts = [0u32; ALPHABET_SIZE];
        for index in letters.chars().filter_map(slot) {
            counts[index] += 1;
        }
        Self { counts }
    }

    /// Count the letters of several words as if they were concatenated
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = [0u32; ALPHABET_SIZE];
        for word in words {
            for index in word.as_ref().chars().filter_map(slot) {
                counts[index] += 1;
            }
        }
        Self { counts }
    }

    /// Number of occurrences of `letter` (case-insensitive, 0 for non-letters)
    pub fn count(&self, letter: char) -> u32 {
        slot(letter).map_or(0, |index| self.counts[index])
    }

    /// Total number of letters
    pub fn len(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    /// True when no letter has a positive count
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// True iff every letter of `other` occurs here at least as often
    pub fn contains(&self, other: &LetterMultiset) -> bool {
        self.counts
            .iter()
            .zip(other.counts.iter())
            .all(|(have, need)| have >= need)
    }

    /// Remove up to `other`'s count of each letter, clamping at zero
    pub fn minus(&self, other: &LetterMultiset) -> LetterMultiset {
        let mut counts = self.counts;
        for (have, take) in counts.iter_mut().zip(other.counts.iter()) {
            *have = have.saturating_sub(*take);
        }
        Self { counts }
    }

    /// Strip this multiset's letters out of `letters`, keeping the order of
    /// what is left
    ///
    /// The first occurrence of each letter is removed first. Letters of this
    /// multiset that `letters` does not have are silently ignored.
    ///
    /// ```
    /// use wordpool_domain::LetterMultiset;
    ///
    /// let used = LetterMultiset::from_letters("get");
    /// assert_eq!(used.remove_from("dgeftoikbvxuaa"), "dfoikbvxuaa");
    /// ```
    pub fn remove_from(&self, letters: &str) -> String {
        let mut pending = self.counts;
        letters
            .chars()
            .filter(|&c| match slot(c) {
                Some(index) if pending[index] > 0 => {
                    pending[index] -= 1;
                    false
                }
                _ => true,
            })
            .collect()
    }
}

/// Letters in alphabetical order, each repeated by its count
impl fmt::Display for LetterMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, &count) in self.counts.iter().enumerate() {
            let letter = (b'a' + index as u8) as char;
            for _ in 0..count {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}
