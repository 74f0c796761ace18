//! Recall Engine - online linear recall model
//!
//! Core principles:
//! - Features: x = [1, review_count, min(days_since_last_review, 365)]
//! - Prediction: p = clamp(w · x, 0, 1), a linear score with hard clipping (no sigmoid)
//! - Learning: one SGD step per answer, w_i <- w_i + lr * (label - p) * x_i
//!
//! The weight vector is the only state. Callers persist it between sessions
//! and hand it back at construction.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{RecallError, Result};
use crate::features::{build_feature_vector, review_state};
use crate::sanitize::clamp_probability;
use crate::types::{
    FeatureVector, ReviewState, WeightVector, DEFAULT_WEIGHTS, FEATURE_DIMENSION, LEARNING_RATE,
};

/// Recall Engine
///
/// Usage scenarios:
/// - Score candidate questions by predicted recall to pick the weakest ones
/// - Learn from each graded answer in real time
#[derive(Debug, Clone, PartialEq)]
pub struct RecallEngine {
    weights: WeightVector,
    learning_rate: f64,
    update_count: u64,
}

impl Default for RecallEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecallEngine {
    /// Create an engine with the prior weights `[0.5, -0.1, -0.05]`
    pub fn new() -> Self {
        Self::with_weights(DEFAULT_WEIGHTS)
    }

    /// Create an engine from previously persisted weights
    pub fn with_weights(weights: WeightVector) -> Self {
        Self {
            weights,
            learning_rate: LEARNING_RATE,
            update_count: 0,
        }
    }

    /// Create an engine from an untyped weight sequence
    ///
    /// `None` falls back to the prior. Any length other than 3 is rejected.
    pub fn from_slice(weights: Option<&[f64]>) -> Result<Self> {
        let Some(weights) = weights else {
            return Ok(Self::new());
        };
        let weights: WeightVector = weights
            .try_into()
            .map_err(|_| RecallError::dimension_mismatch(weights.len()))?;
        Ok(Self::with_weights(weights))
    }

    /// Read-only snapshot of the current weights
    pub fn get_weights(&self) -> WeightVector {
        self.weights
    }

    // ==================== Prediction ====================

    /// Raw linear score w · x
    pub fn score(&self, x: &FeatureVector) -> f64 {
        self.weights.iter().zip(x.iter()).map(|(w, xi)| w * xi).sum()
    }

    /// Predicted recall probability for a validated review state
    pub fn predict_state(&self, state: &ReviewState, now: DateTime<Utc>) -> f64 {
        let x = build_feature_vector(state, now);
        clamp_probability(self.score(&x))
    }

    /// Predicted recall probability relative to an explicit reference time
    pub fn predict_at(
        &self,
        review_count: i64,
        last_reviewed_at: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<f64> {
        let state = review_state(review_count, last_reviewed_at)?;
        Ok(self.predict_state(&state, now))
    }

    /// Predicted recall probability in [0, 1], measured against the current time
    pub fn predict(&self, review_count: i64, last_reviewed_at: Option<&str>) -> Result<f64> {
        self.predict_at(review_count, last_reviewed_at, Utc::now())
    }

    /// Batch predict using parallel processing
    pub fn predict_batch(&self, states: &[ReviewState], now: DateTime<Utc>) -> Vec<f64> {
        states
            .par_iter()
            .map(|state| self.predict_state(state, now))
            .collect()
    }

    // ==================== Learning ====================

    /// Apply one SGD step for a validated review state
    pub fn train_state(
        &mut self,
        state: &ReviewState,
        label: f64,
        now: DateTime<Utc>,
    ) -> WeightVector {
        let x = build_feature_vector(state, now);
        let prediction = clamp_probability(self.score(&x));
        let error = label - prediction;

        let mut next = self.weights;
        for i in 0..FEATURE_DIMENSION {
            next[i] += self.learning_rate * error * x[i];
        }
        self.weights = next;
        self.update_count += 1;

        debug!(
            update_count = self.update_count,
            review_count = state.review_count,
            prediction,
            label,
            error,
            weights = ?self.weights,
            "recall model updated"
        );

        self.weights
    }

    /// Apply one SGD step relative to an explicit reference time
    pub fn train_at(
        &mut self,
        review_count: i64,
        last_reviewed_at: Option<&str>,
        label: f64,
        now: DateTime<Utc>,
    ) -> Result<WeightVector> {
        let state = review_state(review_count, last_reviewed_at)?;
        Ok(self.train_state(&state, label, now))
    }

    /// Learn from one graded answer (label 1.0 correct, 0.0 incorrect)
    ///
    /// Returns the post-update weights for the caller to persist.
    pub fn train(
        &mut self,
        review_count: i64,
        last_reviewed_at: Option<&str>,
        label: f64,
    ) -> Result<WeightVector> {
        self.train_at(review_count, last_reviewed_at, label, Utc::now())
    }
}
