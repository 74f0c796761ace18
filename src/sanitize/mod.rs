use crate::types::{WeightVector, DEFAULT_WEIGHTS};

/// Check whether a slice contains NaN or Inf
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Clamp a raw linear score into a probability
pub fn clamp_probability(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Replace a corrupted weight vector with the prior
///
/// Returns the weights to use and whether a replacement happened.
pub fn sanitize_weights(weights: WeightVector) -> (WeightVector, bool) {
    if has_invalid_values(&weights) {
        (DEFAULT_WEIGHTS, true)
    } else {
        (weights, false)
    }
}
