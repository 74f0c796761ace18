//! # viva-recall - adaptive recall model for a spaced-repetition quiz
//!
//! The crate provides:
//!
//! - **Recall Engine** - a linear recall model with hard clipping, trained
//!   online by one SGD step per graded answer
//! - **Batch selection** - score, shuffle, stable-sort ascending, take the
//!   weakest `batch_size` questions
//! - **Study sessions** - grade answers, train, record review overrides and stats
//! - **Local persistence** - question bank and progress snapshots as JSON
//!
//! ## Modules
//!
//! - [`recall`] - predict / train / get_weights
//! - [`features`] - feature construction shared by predict and train
//! - [`selection`] - ranking protocol with randomized tie-break
//! - [`session`] - study session driver and learner `Progress`
//! - [`stats`] - learner and per-subject statistics
//! - [`store`] - JSON loading and saving
//! - [`sanitize`] - numeric health checks
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use viva_recall::RecallEngine;
//!
//! let mut engine = RecallEngine::new();
//! let recall = engine.predict(0, None).unwrap();
//! assert_eq!(recall, 0.0);
//!
//! let weights = engine.train(0, None, 1.0).unwrap();
//! assert!((weights[0] - 0.51).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod recall;
pub mod sanitize;
pub mod selection;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{RecallError, Result};
pub use recall::RecallEngine;
pub use selection::{BatchSelector, ScoredCandidate};
pub use session::{AnswerFeedback, PlannedQuestion, Progress, StudySession};
pub use types::*;
