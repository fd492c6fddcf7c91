//! Accuracy of the classifier over a labeled test set.

use std::fmt;
use std::hash::Hash;

use log::info;
use num_traits::{AsPrimitive, Float};

use crate::common_types::DataPoint;
use crate::error::{KnnError, Result};
use crate::knn::classify;

/// Outcome of classifying every example of a test set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccuracyReport {
    pub correct: usize,
    pub total: usize,
}

impl AccuracyReport {
    /// Share of exact label matches, in percent.
    pub fn percentage(&self) -> f64 {
        self.correct as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} correct ({}%)", self.correct, self.total, self.percentage())
    }
}

/// Classifies each test example against `training` and counts exact label matches.
///
/// Fails with [`KnnError::InvalidArgument`] on an empty test set; any classification
/// error aborts the whole run.
pub fn evaluate<F, L>(
    training: &[DataPoint<F, L>],
    test: &[DataPoint<F, L>],
    k: usize,
) -> Result<AccuracyReport>
where
    F: Float + AsPrimitive<f64>,
    L: Clone + Eq + Hash,
{
    if test.is_empty() {
        return Err(KnnError::InvalidArgument(
            "cannot compute accuracy of an empty test set".to_string(),
        ));
    }

    let mut correct = 0;
    for example in test {
        if classify(training, &example.features, k)? == example.label {
            correct += 1;
        }
    }

    let report = AccuracyReport { correct, total: test.len() };
    info!("k={k}: {report}");
    Ok(report)
}

/// Percentage of test examples classified correctly.
pub fn accuracy<F, L>(training: &[DataPoint<F, L>], test: &[DataPoint<F, L>], k: usize) -> Result<f64>
where
    F: Float + AsPrimitive<f64>,
    L: Clone + Eq + Hash,
{
    evaluate(training, test, k).map(|report| report.percentage())
}
