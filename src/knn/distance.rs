//! Euclidean distance between feature vectors.

use num_traits::{AsPrimitive, Float};

use crate::error::{KnnError, Result};

/// Calculates the Euclidean distance between two feature vectors.
///
/// Features are widened to `f64` before subtracting, so the whole computation runs in
/// double precision. NaN and infinities propagate by the usual floating-point rules.
///
/// Vectors of different length are rejected with [`KnnError::DimensionMismatch`];
/// `expected` is the length of `a`, `found` the length of `b`.
pub fn euclidean_distance<F>(a: &[F], b: &[F]) -> Result<f64>
where
    F: Float + AsPrimitive<f64>,
{
    if a.len() != b.len() {
        return Err(KnnError::DimensionMismatch { expected: a.len(), found: b.len() });
    }
    let sum_sq_diff: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let diff = x.as_() - y.as_();
            diff * diff
        })
        .sum();
    Ok(sum_sq_diff.sqrt())
}
