//! Study session driver
//!
//! One learner, one session at a time:
//! - `Progress` is everything that survives between sessions (weights,
//!   per-question review overrides, stats)
//! - `StudySession` holds the selected batch and a cursor, grades answers,
//!   trains the recall model and writes the results back into `Progress`

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RecallError, Result};
use crate::features::review_state;
use crate::recall::RecallEngine;
use crate::selection::{BatchSelector, ScoredCandidate};
use crate::types::{
    Question, ReviewOverride, ReviewState, UserStats, WeightVector, DEFAULT_WEIGHTS,
};

/// Learner state persisted across sessions
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub weights: WeightVector,
    pub overrides: BTreeMap<u64, ReviewOverride>,
    pub stats: UserStats,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            overrides: BTreeMap::new(),
            stats: UserStats::default(),
        }
    }
}

impl Progress {
    /// Effective review state: override, then bank values, then "never reviewed"
    pub fn review_state(&self, question: &Question) -> Result<ReviewState> {
        let entry = self.overrides.get(&question.id);
        let count = entry
            .map(|o| o.review_count)
            .or(question.review_count)
            .unwrap_or(0);
        let last = entry
            .map(|o| o.last_reviewed_at.as_str())
            .or(question.last_reviewed_at.as_deref());
        review_state(count, last)
    }

    pub fn engine(&self) -> RecallEngine {
        RecallEngine::with_weights(self.weights)
    }
}

/// Result of grading one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
    pub message: String,
    /// Predicted recall before the model was updated
    pub recall_before: f64,
}

/// Batch entry as shown to the learner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedQuestion {
    pub id: u64,
    pub subject: String,
    pub question_text: String,
    /// Non-empty options only
    pub options: Vec<(char, String)>,
    pub predicted_recall: f64,
}

/// Sorted distinct subjects of the bank
pub fn subjects(bank: &[Question]) -> Vec<String> {
    let mut subjects: Vec<String> = bank.iter().map(|q| q.subject.clone()).collect();
    subjects.sort();
    subjects.dedup();
    subjects
}

#[derive(Debug, Clone)]
pub struct StudySession {
    subject: Option<String>,
    batch: Vec<ScoredCandidate<Question>>,
    cursor: usize,
    answered: bool,
}

impl StudySession {
    /// Pick the weakest-recall questions of `subject` (all subjects when `None`)
    pub fn start(
        progress: &Progress,
        bank: &[Question],
        subject: Option<&str>,
        selector: &mut BatchSelector,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let candidates: Vec<&Question> = bank
            .iter()
            .filter(|q| subject.map_or(true, |s| q.subject == s))
            .collect();

        let engine = progress.engine();
        let batch: Vec<ScoredCandidate<Question>> = selector
            .select_items(&engine, &candidates, |q| progress.review_state(q), now)?
            .into_iter()
            .map(|c| ScoredCandidate {
                item: (*c.item).clone(),
                predicted_recall: c.predicted_recall,
            })
            .collect();

        info!(
            subject = subject.unwrap_or("all"),
            candidates = candidates.len(),
            selected = batch.len(),
            "study session started"
        );

        Ok(Self {
            subject: subject.map(str::to_string),
            batch,
            cursor: 0,
            answered: false,
        })
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn current(&self) -> Option<&Question> {
        self.batch.get(self.cursor).map(|c| &c.item)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.batch.len()
    }

    pub fn plan(&self) -> Vec<PlannedQuestion> {
        self.batch
            .iter()
            .map(|c| PlannedQuestion {
                id: c.item.id,
                subject: c.item.subject.clone(),
                question_text: c.item.question_text.clone(),
                options: c
                    .item
                    .options()
                    .into_iter()
                    .map(|(letter, text)| (letter, text.to_string()))
                    .collect(),
                predicted_recall: c.predicted_recall,
            })
            .collect()
    }

    /// Grade `choice` for the current question and learn from it
    ///
    /// Trains on the review state from before this answer, then records
    /// `review_count + 1` and `now` as the question's new review state.
    pub fn answer(
        &mut self,
        progress: &mut Progress,
        choice: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerFeedback> {
        if self.answered {
            return Err(RecallError::InvalidInput(
                "current question was already answered".to_string(),
            ));
        }
        let question = match self.batch.get(self.cursor) {
            Some(c) => &c.item,
            None => {
                return Err(RecallError::InvalidInput(
                    "session has no remaining questions".to_string(),
                ))
            }
        };

        let is_correct = question.is_correct(choice);
        let state = progress.review_state(question)?;
        let label = if is_correct { 1.0 } else { 0.0 };

        let mut engine = progress.engine();
        let recall_before = engine.predict_state(&state, now);
        progress.weights = engine.train_state(&state, label, now);

        progress.overrides.insert(
            question.id,
            ReviewOverride {
                review_count: i64::from(state.review_count) + 1,
                last_reviewed_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        );
        progress.stats.record(Some(question.subject.as_str()), is_correct);
        self.answered = true;

        let message = if is_correct {
            "CORRECT".to_string()
        } else {
            format!("INCORRECT. ANSWER: {}", question.correct_answer)
        };

        Ok(AnswerFeedback {
            is_correct,
            correct_answer: question.correct_answer.clone(),
            message,
            recall_before,
        })
    }

    /// Move to the next question; `false` once the batch is exhausted
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.batch.len() {
            self.cursor += 1;
        }
        self.answered = false;
        !self.is_finished()
    }
}
