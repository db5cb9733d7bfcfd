//! High score leaderboard
//!
//! Entries are kept sorted by score, highest first. Ties keep submission
//! order, so an earlier run outranks a later one with the same score.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

/// Maximum number of entries retained
pub const MAX_HIGH_SCORES: usize = 1000;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
    /// Unix timestamp (ms) when submitted
    pub timestamp: f64,
}

/// Leaderboard backed by a key-value store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "penguin-climb-scores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would be kept
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it would be dropped)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        Some(self.insertion_point(score) + 1)
    }

    /// Add a score. Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn add_score(&mut self, username: &str, score: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self.insertion_point(score);
        self.entries.insert(
            pos,
            ScoreEntry {
                username: username.to_string(),
                score,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// After every entry with an equal or higher score
    fn insertion_point(&self, score: u32) -> usize {
        self.entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Display rows: (rank, username, score)
    pub fn top(&self, n: usize) -> impl Iterator<Item = (usize, &str, u32)> {
        self.entries
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, e)| (i + 1, e.username.as_str(), e.score))
    }

    /// Rebuild from stored entries, restoring order and cap
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        // Stable sort keeps submission order among ties
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Load from a store. Missing or malformed data yields an empty board.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
            Err(e) => {
                log::error!("Failed to read high scores: {e}");
                return Self::new();
            }
        };
        match serde_json::from_str::<Vec<ScoreEntry>>(&raw) {
            Ok(entries) => {
                let scores = Self::from_entries(entries);
                log::info!("Loaded {} high scores", scores.len());
                scores
            }
            Err(e) => {
                log::warn!("Stored high scores are malformed ({e}), starting fresh");
                Self::new()
            }
        }
    }

    /// Write to a store
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.entries)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Append a score to the stored leaderboard. Failures are logged, never returned.
pub fn save_score(store: &mut dyn KeyValueStore, username: &str, score: u32, timestamp: f64) {
    let mut scores = HighScores::load(store);
    let rank = scores.add_score(username, score, timestamp);
    match scores.save(store) {
        Ok(()) => match rank {
            Some(rank) => log::info!("Saved score {score} for '{username}' at rank {rank}"),
            None => log::info!("Score {score} for '{username}' did not make the board"),
        },
        Err(e) => log::error!("Failed to save score: {e}"),
    }
}

/// Stored leaderboard, highest first
pub fn load_scores(store: &dyn KeyValueStore) -> Vec<ScoreEntry> {
    HighScores::load(store).entries
}

/// Remove the stored leaderboard
pub fn clear_scores(store: &mut dyn KeyValueStore) {
    if let Err(e) = store.remove(HighScores::STORAGE_KEY) {
        log::error!("Failed to clear high scores: {e}");
    }
}
