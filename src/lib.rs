//! k-nearest-neighbour classification of numeric feature vectors.
//!
//! Labeled vectors are read from comma-separated text ([`dataset`]), classified by
//! majority vote among the k closest training points under Euclidean distance
//! ([`knn`]), and scored against a held-out test set ([`evaluate`]). The [`driver`]
//! module holds the command line flow used by the `knn` binary.

pub mod common_types;
pub mod dataset;
pub mod driver;
pub mod error;
pub mod evaluate;
pub mod knn;
#[cfg(feature = "python")]
mod python;

pub use common_types::{DataPoint, LabeledVector};
pub use dataset::Dataset;
pub use error::{KnnError, Result};
pub use evaluate::{accuracy, evaluate, AccuracyReport};
pub use knn::{classify, KnnClassifier};
