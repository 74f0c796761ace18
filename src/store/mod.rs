//! Local JSON persistence
//!
//! - Question bank: a JSON array of `Question` records
//! - Progress snapshot: weights, review overrides and stats of one learner

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{RecallError, Result};
use crate::recall::RecallEngine;
use crate::sanitize::sanitize_weights;
use crate::session::Progress;
use crate::types::{Question, ReviewOverride, UserStats, WeightVector};

pub const SNAPSHOT_VERSION: u32 = 1;

/// On-disk form of `Progress`
///
/// Weights are stored as nullable numbers: JSON has no NaN/Inf, so a
/// corrupted weight round-trips as `null` and is repaired on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub weights: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub overrides: BTreeMap<u64, ReviewOverride>,
    #[serde(default)]
    pub stats: UserStats,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl From<&Progress> for ProgressSnapshot {
    fn from(progress: &Progress) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            weights: Some(
                progress
                    .weights
                    .iter()
                    .map(|w| w.is_finite().then_some(*w))
                    .collect(),
            ),
            overrides: progress.overrides.clone(),
            stats: progress.stats.clone(),
        }
    }
}

impl ProgressSnapshot {
    /// Convert back into `Progress`, validating the weight dimension
    pub fn into_progress(self) -> Result<Progress> {
        let weights = match self.weights {
            Some(raw) => {
                let raw: Vec<f64> = raw.into_iter().map(|w| w.unwrap_or(f64::NAN)).collect();
                restore_weights(&raw)?
            }
            None => RecallEngine::new().get_weights(),
        };
        Ok(Progress {
            weights,
            overrides: self.overrides,
            stats: self.stats,
        })
    }
}

fn restore_weights(raw: &[f64]) -> Result<WeightVector> {
    let weights = RecallEngine::from_slice(Some(raw))?.get_weights();
    let (weights, replaced) = sanitize_weights(weights);
    if replaced {
        warn!(?raw, "persisted weights contained invalid values, reset to prior");
    }
    Ok(weights)
}

// ==================== Question Bank ====================

pub fn parse_question_bank(json: &str) -> Result<Vec<Question>> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_question_bank(path: impl AsRef<Path>) -> Result<Vec<Question>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|err| RecallError::Store(format!("read {}: {err}", path.display())))?;
    let bank = parse_question_bank(&raw)?;
    info!(path = %path.display(), questions = bank.len(), "question bank loaded");
    Ok(bank)
}

// ==================== Progress ====================

/// Load a learner's progress; a missing file yields fresh progress
pub fn load_progress(path: impl AsRef<Path>) -> Result<Progress> {
    let path = path.as_ref();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no saved progress, starting fresh");
            return Ok(Progress::default());
        }
        Err(err) => return Err(err.into()),
    };
    let snapshot: ProgressSnapshot = serde_json::from_str(&raw)?;
    snapshot.into_progress()
}

/// Write progress through a sibling temp file and rename it into place
pub fn save_progress(path: impl AsRef<Path>, progress: &Progress) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(&ProgressSnapshot::from(progress))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, json)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_WEIGHTS;

    #[test]
    fn test_parse_question_bank() {
        let json = r#"[
            {"id": 1, "subject": "Anatomy", "question_text": "Q1",
             "option_a": "a", "option_b": "b", "option_c": "c", "option_d": "d",
             "correct_answer": "C"},
            {"id": 2, "subject": "Physiology", "question_text": "Q2",
             "option_a": "a", "option_b": "b", "correct_answer": "A"}
        ]"#;
        let bank = parse_question_bank(json).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank[1].options().len(), 2);
    }

    #[test]
    fn test_parse_question_bank_rejects_bad_json() {
        let err = parse_question_bank("{not json").unwrap_err();
        assert!(matches!(err, RecallError::Store(_)));
    }

    #[test]
    fn test_snapshot_repairs_null_weight() {
        let json = r#"{"version": 1, "weights": [0.5, null, 0.1]}"#;
        let snapshot: ProgressSnapshot = serde_json::from_str(json).unwrap();
        let progress = snapshot.into_progress().unwrap();
        assert_eq!(progress.weights, DEFAULT_WEIGHTS);
    }

    #[test]
    fn test_snapshot_wrong_dimension() {
        let json = r#"{"weights": [0.5, 0.1]}"#;
        let snapshot: ProgressSnapshot = serde_json::from_str(json).unwrap();
        assert!(matches!(
            snapshot.into_progress(),
            Err(RecallError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // Renaming a file over a non-empty directory fails
        let target = dir.path().join("progress.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let result = save_progress(&target, &Progress::default());
        assert!(matches!(result, Err(RecallError::Store(_))));
        assert!(!dir.path().join("progress.json.tmp").exists());
    }

    #[test]
    fn test_snapshot_missing_weights_uses_prior() {
        let snapshot: ProgressSnapshot = serde_json::from_str("{}").unwrap();
        let progress = snapshot.into_progress().unwrap();
        assert_eq!(progress, Progress::default());
    }
}
