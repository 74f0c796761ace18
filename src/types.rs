use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Number of model features: [bias, review_count, days_since_last_review]
pub const FEATURE_DIMENSION: usize = 3;

/// Prior weights: new items start at moderate recall, reviews raise it, elapsed days lower it
pub const DEFAULT_WEIGHTS: WeightVector = [0.5, -0.1, -0.05];

/// SGD step size
pub const LEARNING_RATE: f64 = 0.01;

/// Recency assigned to items that were never reviewed (days)
pub const NEVER_REVIEWED_DAYS: f64 = 100.0;

/// Upper bound of the recency feature (days)
pub const MAX_RECENCY_DAYS: f64 = 365.0;

/// Default number of questions in one study batch
pub const DEFAULT_BATCH_SIZE: usize = 10;

pub const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

// ==================== Model Types ====================

/// `[bias, w_count, w_recency]`
pub type WeightVector = [f64; FEATURE_DIMENSION];

/// `[1.0, review_count, clamped_days_since_last_review]`
pub type FeatureVector = [f64; FEATURE_DIMENSION];

/// Review history of one question at prediction/training time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReviewState {
    pub review_count: u32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewState {
    pub fn new(review_count: u32, last_reviewed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            review_count,
            last_reviewed_at,
        }
    }
}

// ==================== Question Bank ====================

/// One multiple-choice question, field names as stored in the question bank JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub subject: String,
    pub question_text: String,
    #[serde(default)]
    pub option_a: String,
    #[serde(default)]
    pub option_b: String,
    #[serde(default)]
    pub option_c: String,
    #[serde(default)]
    pub option_d: String,
    /// Letter of the correct option ("A".."D")
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
}

impl Question {
    /// Non-empty options as `(letter, text)` pairs
    pub fn options(&self) -> Vec<(char, &str)> {
        [
            ('A', self.option_a.as_str()),
            ('B', self.option_b.as_str()),
            ('C', self.option_c.as_str()),
            ('D', self.option_d.as_str()),
        ]
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .collect()
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        choice.trim().eq_ignore_ascii_case(self.correct_answer.trim())
    }
}

/// Review state recorded after an answer; takes precedence over the bank's values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOverride {
    pub review_count: i64,
    pub last_reviewed_at: String,
}

// ==================== Statistics ====================

/// Learner-wide answer statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_attempted: u32,
    pub correct_count: u32,
    /// 0-100
    pub mastery: u32,
    #[serde(default)]
    pub subject_progress: BTreeMap<String, u32>,
}

/// Per-subject coverage summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub subject: String,
    pub total_questions: u32,
    pub attempted: u32,
    pub total_reviews: i64,
    pub mastery: u32,
}
