pub mod distance;
pub mod heap_utils;
pub mod vote;

use std::hash::Hash;

use log::{debug, trace};
use num_traits::{AsPrimitive, Float};

use crate::common_types::DataPoint;
use crate::error::{KnnError, Result};
use self::distance::euclidean_distance;
use self::heap_utils::KBestNeighbors;
use self::vote::VoteTally;

/// Checks that `k` neighbours can be drawn from `n_points` training points.
fn validate_k(k: usize, n_points: usize) -> Result<()> {
    if k == 0 {
        return Err(KnnError::InvalidArgument("k must be greater than 0".to_string()));
    }
    if k > n_points {
        return Err(KnnError::InvalidArgument(format!(
            "k ({k}) exceeds the number of training points ({n_points})"
        )));
    }
    Ok(())
}

/// Returns the `k` training points closest to `query`, nearest first, as `(distance, point)` pairs.
///
/// Points at equal distance keep their training-set order.
pub fn nearest_neighbors<'a, F, L>(
    training: &'a [DataPoint<F, L>],
    query: &[F],
    k: usize,
) -> Result<Vec<(f64, &'a DataPoint<F, L>)>>
where
    F: Float + AsPrimitive<f64>,
{
    validate_k(k, training.len())?;
    // The first training point fixes the expected dimensionality.
    let expected = training.first().map_or(0, DataPoint::dimensionality);
    if query.len() != expected {
        return Err(KnnError::DimensionMismatch { expected, found: query.len() });
    }

    let mut nearest = KBestNeighbors::new(k);
    for (index, point) in training.iter().enumerate() {
        let distance = euclidean_distance(&point.features, query)?;
        nearest.add(distance, index, point);
    }
    Ok(nearest.into_sorted())
}

/// Classifies `query` by majority vote among its `k` nearest training points.
///
/// Vote ties go to the tied label whose nearest member is closest to the query
/// (and, at equal distance, earliest in the training set).
///
/// # Errors
/// - [`KnnError::InvalidArgument`] if `k` is 0 or larger than the training set.
/// - [`KnnError::DimensionMismatch`] if `query` and the training vectors differ in length.
pub fn classify<F, L>(training: &[DataPoint<F, L>], query: &[F], k: usize) -> Result<L>
where
    F: Float + AsPrimitive<f64>,
    L: Clone + Eq + Hash,
{
    let neighbors = nearest_neighbors(training, query, k)?;
    let tally: VoteTally<&L> = neighbors.iter().map(|(_, point)| &point.label).collect();
    let label = tally
        .winner()
        .cloned()
        .ok_or_else(|| KnnError::InvalidArgument("no neighbours to vote on".to_string()))?;
    trace!(
        "classified query of {} features from {} neighbours (nearest at {:?})",
        query.len(),
        neighbors.len(),
        neighbors.first().map(|(d, _)| *d)
    );
    Ok(label)
}

/// The K-Nearest Neighbors Classifier.
///
/// Holds `k` and a training set; `fit` replaces the training set and checks that `k`
/// is usable with it. Predictions are brute force: every training point is measured.
#[derive(Debug, Clone)]
pub struct KnnClassifier<F, L> {
    k: usize,
    training_data: Vec<DataPoint<F, L>>,
}

impl<F, L> KnnClassifier<F, L>
where
    F: Float + AsPrimitive<f64>,
    L: Clone + Eq + Hash,
{
    pub fn new(k: usize) -> Self {
        Self { k, training_data: Vec::new() }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn training_data(&self) -> &[DataPoint<F, L>] {
        &self.training_data
    }

    /// Stores the training data, replacing any previous set.
    ///
    /// Fails with [`KnnError::InvalidArgument`] if `k` is 0 or exceeds the number of points;
    /// the previous training data is kept in that case.
    pub fn fit(&mut self, training_data: Vec<DataPoint<F, L>>) -> Result<()> {
        validate_k(self.k, training_data.len())?;
        debug!(
            "fitted k={} on {} points of {} features",
            self.k,
            training_data.len(),
            training_data.first().map_or(0, DataPoint::dimensionality)
        );
        self.training_data = training_data;
        Ok(())
    }

    /// Predicts the label for a single sample.
    ///
    /// Calling this before a successful `fit` is an [`KnnError::InvalidArgument`].
    pub fn predict_single(&self, test_sample_features: &[F]) -> Result<L> {
        classify(&self.training_data, test_sample_features, self.k)
    }

    /// Predicts labels for a batch of samples. The first failure aborts the batch.
    pub fn predict(&self, test_data: &[Vec<F>]) -> Result<Vec<L>> {
        test_data.iter().map(|sample| self.predict_single(sample)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small_training_set() -> Vec<DataPoint<f64, &'static str>> {
        vec![
            DataPoint::new(vec![1.0, 1.0], "A"),
            DataPoint::new(vec![5.0, 5.0], "B"),
            DataPoint::new(vec![1.0, 2.0], "A"),
        ]
    }

    #[test]
    fn test_two_equidistant_neighbours_vote_together() {
        // Query (1, 1.5) is 0.5 away from both "A" points; "B" is far off.
        let training = small_training_set();
        assert_eq!(classify(&training, &[1.0, 1.5], 2).unwrap(), "A");
    }

    #[test]
    fn test_k1_returns_the_strictly_closest_label() {
        let training = vec![
            DataPoint::new(vec![0.0, 0.0], 10),
            DataPoint::new(vec![10.0, 10.0], 20),
            DataPoint::new(vec![4.0, 4.0], 30),
        ];
        assert_eq!(classify(&training, &[1.0, 1.0], 1).unwrap(), 10);
        assert_eq!(classify(&training, &[9.0, 9.0], 1).unwrap(), 20);
        assert_eq!(classify(&training, &[4.5, 3.5], 1).unwrap(), 30);
    }

    #[test]
    fn test_k1_matches_brute_force_on_random_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let training: Vec<DataPoint<f64, usize>> = (0..200)
            .map(|i| DataPoint::new(vec![rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)], i))
            .collect();

        for _ in 0..20 {
            let query = [rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)];
            let expected = training
                .iter()
                .min_by(|a, b| {
                    let da = euclidean_distance(&a.features, &query).unwrap();
                    let db = euclidean_distance(&b.features, &query).unwrap();
                    da.partial_cmp(&db).unwrap()
                })
                .map(|p| p.label)
                .unwrap();
            assert_eq!(classify(&training, &query, 1).unwrap(), expected);
        }
    }

    #[test]
    fn test_majority_outvotes_the_single_closest_point() {
        let training = vec![
            DataPoint::new(vec![0.0], "near"),
            DataPoint::new(vec![1.0], "crowd"),
            DataPoint::new(vec![-1.0], "crowd"),
            DataPoint::new(vec![100.0], "near"),
        ];
        assert_eq!(classify(&training, &[0.0], 3).unwrap(), "crowd");
    }

    #[test]
    fn test_vote_tie_goes_to_the_nearest_label() {
        // k=2 with one vote each: "Y" is closer, so it wins even though "X" comes first in training order.
        let training = vec![
            DataPoint::new(vec![3.0], "X"),
            DataPoint::new(vec![1.0], "Y"),
        ];
        assert_eq!(classify(&training, &[0.0], 2).unwrap(), "Y");

        // At equal distance, training order decides.
        let training = vec![
            DataPoint::new(vec![-1.0], "X"),
            DataPoint::new(vec![1.0], "Y"),
        ];
        assert_eq!(classify(&training, &[0.0], 2).unwrap(), "X");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let training: Vec<DataPoint<f64, String>> = (0..30)
            .map(|i| DataPoint::new(vec![(i % 5) as f64, (i % 3) as f64], format!("L{}", i % 4)))
            .collect();
        let first = classify(&training, &[2.0, 1.0], 4).unwrap();
        for _ in 0..20 {
            assert_eq!(classify(&training, &[2.0, 1.0], 4).unwrap(), first);
        }
    }

    #[test]
    fn test_invalid_k_is_rejected() {
        let training = small_training_set();
        assert!(matches!(classify(&training, &[1.0, 1.0], 0), Err(KnnError::InvalidArgument(_))));
        assert!(matches!(classify(&training, &[1.0, 1.0], 4), Err(KnnError::InvalidArgument(_))));
        assert!(classify(&training, &[1.0, 1.0], 3).is_ok());

        let empty: Vec<DataPoint<f64, &str>> = Vec::new();
        assert!(matches!(classify(&empty, &[], 1), Err(KnnError::InvalidArgument(_))));
    }

    #[test]
    fn test_query_dimension_mismatch_is_rejected() {
        let training = small_training_set();
        match classify(&training, &[1.0, 1.0, 1.0], 1) {
            Err(KnnError::DimensionMismatch { expected: 2, found: 3 }) => {}
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_inconsistent_training_dimensions_surface_from_distance() {
        let training = vec![
            DataPoint::new(vec![1.0, 1.0], "A"),
            DataPoint::new(vec![1.0, 1.0, 1.0], "B"),
        ];
        assert!(matches!(
            classify(&training, &[1.0, 1.0], 1),
            Err(KnnError::DimensionMismatch { expected: 3, found: 2 })
        ));
    }

    #[test]
    fn test_zero_feature_points_are_all_equidistant() {
        let training = vec![
            DataPoint::new(Vec::<f64>::new(), "first"),
            DataPoint::new(Vec::new(), "second"),
        ];
        assert_eq!(classify(&training, &[], 1).unwrap(), "first");
    }

    #[test]
    fn test_nearest_neighbors_are_sorted() {
        let training = small_training_set();
        let neighbors = nearest_neighbors(&training, &[5.0, 5.0], 3).unwrap();
        let labels: Vec<_> = neighbors.iter().map(|(_, p)| p.label).collect();
        assert_eq!(labels, vec!["B", "A", "A"]);
        assert!(neighbors.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_classifier_fit_and_predict() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(3);
        let training_data = vec![
            DataPoint { features: vec![1.0, 1.0], label: "A" },
            DataPoint { features: vec![1.0, 2.0], label: "A" },
            DataPoint { features: vec![2.0, 1.0], label: "A" },
            DataPoint { features: vec![5.0, 5.0], label: "B" },
            DataPoint { features: vec![5.0, 6.0], label: "B" },
            DataPoint { features: vec![6.0, 5.0], label: "B" },
        ];
        classifier.fit(training_data).unwrap();
        assert_eq!(classifier.training_data().len(), 6);

        assert_eq!(classifier.predict_single(&[1.5, 1.5]).unwrap(), "A");
        let predictions = classifier.predict(&[vec![5.5, 5.5], vec![0.0, 0.0]]).unwrap();
        assert_eq!(predictions, vec!["B", "A"]);
    }

    #[test]
    fn test_classifier_rejects_k_larger_than_training_set() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(3);
        let result = classifier.fit(vec![DataPoint::new(vec![0.0], "X")]);
        assert!(matches!(result, Err(KnnError::InvalidArgument(_))));
        assert!(classifier.training_data().is_empty());
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1);
        assert!(matches!(classifier.predict_single(&[1.0]), Err(KnnError::InvalidArgument(_))));
    }

    #[test]
    fn test_predict_batch_aborts_on_first_error() {
        let mut classifier: KnnClassifier<f64, &str> = KnnClassifier::new(1);
        classifier.fit(vec![DataPoint::new(vec![0.0], "X")]).unwrap();
        let result = classifier.predict(&[vec![1.0], vec![1.0, 2.0]]);
        assert!(matches!(result, Err(KnnError::DimensionMismatch { .. })));
    }
}
