//! Leaderboard of retired dogs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Largest page [`ScoreStore::scores`] accepts.
pub const MAX_SCORES_PAGE: usize = 100;

/// Final result of a retired dog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Dog name.
    pub name: String,
    /// Final score.
    pub score: i64,
    /// Time from join to retirement.
    pub play_time: Duration,
}

/// Persistent storage for final scores.
pub trait ScoreStore {
    /// Record one retired dog.
    fn add_score(&mut self, record: ScoreRecord) -> AppResult<()>;

    /// A page of records ordered by score (highest first), then play time
    /// (shortest first), then name. `limit` must not exceed
    /// [`MAX_SCORES_PAGE`].
    fn scores(&self, offset: usize, limit: usize) -> AppResult<Vec<ScoreRecord>>;
}

/// A [`ScoreStore`] kept in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScores {
    records: Vec<ScoreRecord>,
}

impl InMemoryScores {
    /// An empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for InMemoryScores {
    fn add_score(&mut self, record: ScoreRecord) -> AppResult<()> {
        let at = self.records.partition_point(|r| {
            (std::cmp::Reverse(r.score), r.play_time, &r.name)
                <= (std::cmp::Reverse(record.score), record.play_time, &record.name)
        });
        self.records.insert(at, record);
        Ok(())
    }

    fn scores(&self, offset: usize, limit: usize) -> AppResult<Vec<ScoreRecord>> {
        if limit > MAX_SCORES_PAGE {
            return Err(AppError::InvalidPagination {
                limit,
                max: MAX_SCORES_PAGE,
            });
        }
        Ok(self.records.iter().skip(offset).take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, score: i64, secs: u64) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            score,
            play_time: Duration::from_secs(secs),
        }
    }

    fn names(records: &[ScoreRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn ordered_by_score_then_time_then_name() {
        let mut store = InMemoryScores::new();
        store.add_score(record("slow", 50, 90)).unwrap();
        store.add_score(record("low", 10, 5)).unwrap();
        store.add_score(record("fast", 50, 30)).unwrap();
        store.add_score(record("best", 80, 100)).unwrap();
        store.add_score(record("also-fast", 50, 30)).unwrap();

        let page = store.scores(0, 10).unwrap();
        assert_eq!(names(&page), vec!["best", "also-fast", "fast", "slow", "low"]);
    }

    #[test]
    fn pagination() {
        let mut store = InMemoryScores::new();
        for i in 0..5 {
            store.add_score(record(&format!("d{i}"), i, 1)).unwrap();
        }
        assert_eq!(names(&store.scores(1, 2).unwrap()), vec!["d3", "d2"]);
        assert!(store.scores(10, 5).unwrap().is_empty());
        assert_eq!(store.scores(0, MAX_SCORES_PAGE).unwrap().len(), 5);
    }

    #[test]
    fn oversized_page_is_rejected() {
        let store = InMemoryScores::new();
        assert!(matches!(
            store.scores(0, MAX_SCORES_PAGE + 1),
            Err(AppError::InvalidPagination { limit: 101, max: 100 })
        ));
    }
}
