//! Study batch selection
//!
//! Ranking protocol:
//! 1. Score every candidate with the recall engine (parallel, prediction is pure)
//! 2. Shuffle the scored set so equal scores do not keep dataset order
//! 3. Stable sort ascending by predicted recall
//! 4. Take the first `batch_size` items
//!
//! The shuffle must happen before the sort. Brand-new items all share the
//! sentinel recency and therefore the same score; without the shuffle they
//! would always come back in bank order.

use chrono::{DateTime, Utc};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::recall::RecallEngine;
use crate::types::{ReviewState, DEFAULT_BATCH_SIZE};

/// A candidate paired with its predicted recall
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<T> {
    pub item: T,
    pub predicted_recall: f64,
}

/// Score candidates in parallel
///
/// `review_state` resolves each item's history; the first failure aborts scoring.
pub fn score_candidates<'a, T, F>(
    engine: &RecallEngine,
    items: &'a [T],
    review_state: F,
    now: DateTime<Utc>,
) -> Result<Vec<ScoredCandidate<&'a T>>>
where
    T: Sync,
    F: Fn(&T) -> Result<ReviewState> + Sync,
{
    items
        .par_iter()
        .map(|item| {
            let state = review_state(item)?;
            Ok(ScoredCandidate {
                item,
                predicted_recall: engine.predict_state(&state, now),
            })
        })
        .collect()
}

/// Shuffle, stable-sort ascending by recall, and keep the first `batch_size`
pub fn select_lowest_recall<T, R>(
    mut scored: Vec<ScoredCandidate<T>>,
    batch_size: usize,
    rng: &mut R,
) -> Vec<ScoredCandidate<T>>
where
    R: Rng + ?Sized,
{
    scored.shuffle(rng);
    scored.sort_by(|a, b| a.predicted_recall.total_cmp(&b.predicted_recall));
    scored.truncate(batch_size);
    scored
}

/// Batch selector owning the tie-break RNG
#[derive(Debug, Clone)]
pub struct BatchSelector {
    batch_size: usize,
    rng: ChaCha8Rng,
}

impl Default for BatchSelector {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchSelector {
    /// Create a selector seeded from OS entropy
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a selector with a specific seed (for testing)
    pub fn with_seed(batch_size: usize, seed: u64) -> Self {
        Self {
            batch_size,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Apply the tie-break shuffle and ascending sort to already scored items
    pub fn select<T>(&mut self, scored: Vec<ScoredCandidate<T>>) -> Vec<ScoredCandidate<T>> {
        select_lowest_recall(scored, self.batch_size, &mut self.rng)
    }

    /// Score and select in one pass
    pub fn select_items<'a, T, F>(
        &mut self,
        engine: &RecallEngine,
        items: &'a [T],
        review_state: F,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredCandidate<&'a T>>>
    where
        T: Sync,
        F: Fn(&T) -> Result<ReviewState> + Sync,
    {
        let scored = score_candidates(engine, items, review_state, now)?;
        let candidates = scored.len();
        let batch = self.select(scored);
        debug!(candidates, selected = batch.len(), "study batch selected");
        Ok(batch)
    }
}
