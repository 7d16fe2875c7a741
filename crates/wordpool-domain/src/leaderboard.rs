//! Leaderboard module - the global top-10 word table
//!
//! The table keeps at most [`LEADERBOARD_CAPACITY`] distinct words. An offer
//! is resolved against a snapshot of the current entries by [`plan_offer`];
//! storage applies the plan inside the same transaction that read the
//! snapshot, so the "is it full / what is the minimum" read and the write
//! never interleave with another offer.
//!
//! When several entries share the minimum score, the lexicographically
//! smallest word is evicted.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Maximum number of entries on the leaderboard
pub const LEADERBOARD_CAPACITY: usize = 10;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// The word (unique across the table)
    pub word: String,

    /// Best score ever recorded for the word
    pub score: u32,
}

impl LeaderboardEntry {
    /// Create an entry
    pub fn new(word: impl Into<String>, score: u32) -> Self {
        Self {
            word: word.into(),
            score,
        }
    }
}

/// What an offer does to the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferPlan {
    /// Word absent and a slot is free: insert it
    Insert,

    /// Word present with a lower score: raise it
    Raise {
        /// Score before the raise
        from: u32,
    },

    /// Table full and the word beats the minimum: evict, then insert
    Replace {
        /// The entry to evict
        evicted: LeaderboardEntry,
    },

    /// Nothing changes
    Keep,
}

impl OfferPlan {
    /// True if applying the plan changes the table
    pub fn mutates(&self) -> bool {
        !matches!(self, OfferPlan::Keep)
    }
}

/// Decide what offering `(word, score)` does to `entries`
///
/// An existing word is never downgraded. A new word enters a full table only
/// with a score strictly greater than the current minimum.
pub fn plan_offer(entries: &[LeaderboardEntry], word: &str, score: u32) -> OfferPlan {
    if let Some(existing) = entries.iter().find(|e| e.word == word) {
        return if score > existing.score {
            OfferPlan::Raise {
                from: existing.score,
            }
        } else {
            OfferPlan::Keep
        };
    }

    if entries.len() < LEADERBOARD_CAPACITY {
        return OfferPlan::Insert;
    }

    match eviction_candidate(entries) {
        Some(lowest) if score > lowest.score => OfferPlan::Replace {
            evicted: lowest.clone(),
        },
        _ => OfferPlan::Keep,
    }
}

/// The entry evicted first: minimum score, then smallest word
pub fn eviction_candidate(entries: &[LeaderboardEntry]) -> Option<&LeaderboardEntry> {
    entries
        .iter()
        .min_by(|a, b| a.score.cmp(&b.score).then_with(|| a.word.cmp(&b.word)))
}

/// Sort entries for display: score descending, then word ascending
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.word.cmp(&b.word)));
}

/// Read-through cache for the top-scores listing
///
/// Entries expire after the configured TTL. Writers must call
/// [`invalidate`](Self::invalidate) before releasing the lock that guards
/// the underlying table, and readers must [`put`](Self::put) under that same
/// lock, otherwise a stale listing can be re-cached after a rank change.
#[derive(Debug)]
pub struct ScoreCache {
    ttl: Duration,
    slot: RwLock<Option<(Instant, Vec<LeaderboardEntry>)>>,
}

impl ScoreCache {
    /// Create an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Cached listing, if present and fresh
    pub fn get(&self) -> Option<Vec<LeaderboardEntry>> {
        let slot = self.slot.read().ok()?;
        match slot.as_ref() {
            Some((stored_at, entries)) if stored_at.elapsed() < self.ttl => Some(entries.clone()),
            _ => None,
        }
    }

    /// Store a freshly computed listing
    pub fn put(&self, entries: Vec<LeaderboardEntry>) {
        if let Ok(mut slot) = self.slot.write() {
            *slot = Some((Instant::now(), entries));
        }
    }

    /// Drop the cached listing
    pub fn invalidate(&self) {
        match self.slot.write() {
            Ok(mut slot) => *slot = None,
            // a poisoned slot may hold anything; clear it anyway
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_table() -> Vec<LeaderboardEntry> {
        (0..10)
            .map(|i| LeaderboardEntry::new(format!("word{}", i), 10 + i as u32))
            .collect()
    }

    #[test]
    fn test_insert_when_room() {
        let entries = vec![LeaderboardEntry::new("fox", 3)];
        assert_eq!(plan_offer(&entries, "get", 3), OfferPlan::Insert);
        assert_eq!(plan_offer(&[], "get", 0), OfferPlan::Insert);
    }

    #[test]
    fn test_no_downgrade() {
        let entries = vec![LeaderboardEntry::new("fox", 5)];
        assert_eq!(plan_offer(&entries, "fox", 2), OfferPlan::Keep);
        assert_eq!(plan_offer(&entries, "fox", 5), OfferPlan::Keep);
        assert_eq!(plan_offer(&entries, "fox", 6), OfferPlan::Raise { from: 5 });
    }

    #[test]
    fn test_full_table_requires_strictly_higher_score() {
        let entries = full_table();
        assert_eq!(plan_offer(&entries, "new", 10), OfferPlan::Keep);
        assert_eq!(plan_offer(&entries, "new", 9), OfferPlan::Keep);
        assert_eq!(
            plan_offer(&entries, "new", 11),
            OfferPlan::Replace {
                evicted: LeaderboardEntry::new("word0", 10)
            }
        );
    }

    #[test]
    fn test_existing_word_in_full_table_is_raised_not_replaced() {
        let entries = full_table();
        assert_eq!(plan_offer(&entries, "word0", 50), OfferPlan::Raise { from: 10 });
    }

    #[test]
    fn test_eviction_tie_break_smallest_word() {
        let mut entries = full_table();
        entries[3] = LeaderboardEntry::new("alpha", 1);
        entries[7] = LeaderboardEntry::new("zulu", 1);
        entries[5] = LeaderboardEntry::new("mike", 1);

        assert_eq!(eviction_candidate(&entries).unwrap().word, "alpha");
        assert_eq!(
            plan_offer(&entries, "new", 2),
            OfferPlan::Replace {
                evicted: LeaderboardEntry::new("alpha", 1)
            }
        );
    }

    #[test]
    fn test_rank_orders_by_score_then_word() {
        let mut entries = vec![
            LeaderboardEntry::new("b", 3),
            LeaderboardEntry::new("c", 5),
            LeaderboardEntry::new("a", 3),
        ];
        rank(&mut entries);
        let words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_plan_mutates() {
        assert!(OfferPlan::Insert.mutates());
        assert!(OfferPlan::Raise { from: 1 }.mutates());
        assert!(!OfferPlan::Keep.mutates());
    }

    #[test]
    fn test_cache_round_trip_and_invalidate() {
        let cache = ScoreCache::new(Duration::from_secs(60));
        assert!(cache.get().is_none());

        cache.put(vec![LeaderboardEntry::new("fox", 3)]);
        assert_eq!(cache.get().unwrap().len(), 1);

        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_cache_expires() {
        let cache = ScoreCache::new(Duration::ZERO);
        cache.put(vec![LeaderboardEntry::new("fox", 3)]);
        assert!(cache.get().is_none());
    }
}
