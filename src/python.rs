//! Python bindings, built with the `python` feature.

use std::path::PathBuf;

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::common_types::LabeledVector;
use crate::dataset::Dataset;
use crate::error::KnnError;
use crate::knn::{distance, KnnClassifier};

/// Python-side representation of a labeled vector: `(features, label)`.
type PyPoint = (Vec<f64>, String);

impl From<KnnError> for PyErr {
    fn from(err: KnnError) -> PyErr {
        match err {
            KnnError::Io { .. } => PyIOError::new_err(err.to_string()),
            KnnError::Format { .. } | KnnError::DimensionMismatch { .. } | KnnError::InvalidArgument(_) => {
                PyValueError::new_err(err.to_string())
            }
        }
    }
}

fn to_points(points: Vec<PyPoint>) -> Vec<LabeledVector> {
    points
        .into_iter()
        .map(|(features, label)| LabeledVector::new(features, label))
        .collect()
}

/// Calculates the Euclidean distance between two vectors of f64.
#[pyfunction]
fn euclidean_distance(a: Vec<f64>, b: Vec<f64>) -> PyResult<f64> {
    Ok(distance::euclidean_distance(&a, &b)?)
}

/// Loads a comma-separated file into a list of `(features, label)` tuples.
#[pyfunction]
fn load_dataset(path: PathBuf) -> PyResult<Vec<PyPoint>> {
    let dataset = Dataset::load(path)?;
    Ok(dataset
        .into_points()
        .into_iter()
        .map(|point| (point.features, point.label))
        .collect())
}

#[pyfunction]
fn classify(training: Vec<PyPoint>, query: Vec<f64>, k: usize) -> PyResult<String> {
    Ok(crate::knn::classify(&to_points(training), &query, k)?)
}

/// Percentage of `test` classified correctly against `training`.
#[pyfunction]
fn accuracy(training: Vec<PyPoint>, test: Vec<PyPoint>, k: usize) -> PyResult<f64> {
    Ok(crate::evaluate::accuracy(&to_points(training), &to_points(test), k)?)
}

#[pyclass(name = "KnnClassifier")]
struct PyKnnClassifier {
    classifier: KnnClassifier<f64, String>,
}

#[pymethods]
impl PyKnnClassifier {
    #[new]
    fn new(k: usize) -> Self {
        PyKnnClassifier { classifier: KnnClassifier::new(k) }
    }

    /// Expects a list of `(features, label)` tuples.
    fn fit(&mut self, training_data: Vec<PyPoint>) -> PyResult<()> {
        Ok(self.classifier.fit(to_points(training_data))?)
    }

    fn predict_single(&self, test_sample_features: Vec<f64>) -> PyResult<String> {
        Ok(self.classifier.predict_single(&test_sample_features)?)
    }

    fn predict(&self, test_data: Vec<Vec<f64>>) -> PyResult<Vec<String>> {
        Ok(self.classifier.predict(&test_data)?)
    }

    #[getter]
    fn k(&self) -> usize {
        self.classifier.k()
    }
}

/// The `knn_vote` Python module. The name must match `lib.name` in `Cargo.toml`.
#[pymodule]
fn knn_vote(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(euclidean_distance, m)?)?;
    m.add_function(wrap_pyfunction!(load_dataset, m)?)?;
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_function(wrap_pyfunction!(accuracy, m)?)?;
    m.add_class::<PyKnnClassifier>()?;
    Ok(())
}
