//! This module contains the data structures shared by the loader, classifier and evaluator.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a single labeled example: a feature vector and its class label.
///
/// - `F`: The type of the features (e.g., `f64`, `f32`).
/// - `L`: The type of the label (e.g., `String`, `&str`, an enum).
///
/// Points are built once and never mutated afterwards; the collection holding them owns them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

/// The concrete point type read from delimited text files.
pub type LabeledVector = DataPoint<f64, String>;

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }

    /// Number of features in this point.
    pub fn dimensionality(&self) -> usize {
        self.features.len()
    }
}
