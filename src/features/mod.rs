//! Feature construction shared by prediction and training.
//!
//! Both `predict` and `train` must see exactly the same feature vector for the
//! same review state, so everything that turns raw review history into model
//! input lives here:
//! - timestamp parsing (RFC 3339; offset-less ISO datetimes and bare
//!   `YYYY-MM-DD` dates are read as UTC)
//! - recency in fractional days, with a sentinel for never-reviewed items
//! - clamping of recency at `MAX_RECENCY_DAYS`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{RecallError, Result};
use crate::types::{
    FeatureVector, ReviewState, MAX_RECENCY_DAYS, NEVER_REVIEWED_DAYS, SECONDS_PER_DAY,
};

/// Parse a review timestamp
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(RecallError::InvalidInput(format!(
        "last_reviewed_at is not a valid timestamp: {raw:?}"
    )))
}

/// Validate raw caller input into a `ReviewState`
pub fn review_state(review_count: i64, last_reviewed_at: Option<&str>) -> Result<ReviewState> {
    if review_count < 0 {
        return Err(RecallError::InvalidInput(format!(
            "review_count must be a non-negative integer, got {review_count}"
        )));
    }
    let review_count = u32::try_from(review_count).map_err(|_| {
        RecallError::InvalidInput(format!(
            "review_count {review_count} is out of range (max {})",
            u32::MAX
        ))
    })?;
    let last_reviewed_at = last_reviewed_at.map(parse_timestamp).transpose()?;
    Ok(ReviewState::new(review_count, last_reviewed_at))
}

/// Fractional days between the last review and `now`
///
/// Never-reviewed items get `NEVER_REVIEWED_DAYS`. A review in the future
/// yields a negative value; only the upper end is clamped.
pub fn days_since_last_review(last_reviewed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match last_reviewed_at {
        Some(ts) => (now - ts).num_milliseconds() as f64 / (SECONDS_PER_DAY * 1000.0),
        None => NEVER_REVIEWED_DAYS,
    }
}

/// Build `[1.0, review_count, min(days_since, 365)]`
pub fn build_feature_vector(state: &ReviewState, now: DateTime<Utc>) -> FeatureVector {
    let days = days_since_last_review(state.last_reviewed_at, now);
    [1.0, state.review_count as f64, days.min(MAX_RECENCY_DAYS)]
}
