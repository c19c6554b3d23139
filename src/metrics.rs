//! Classification quality of a trained network on a labelled partition.

use crate::{
    data::dataset::Dataset,
    error::{Error, Result},
    math::matrix::Matrix,
    network::network::Network,
};

/// Accuracy plus macro-averaged precision and recall, all as fractions in
/// [0, 1]. A class that is never predicted contributes a precision of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    /// `confusion[actual][predicted]`
    pub confusion: Vec<Vec<usize>>,
}

impl ClassificationReport {
    /// Scores `network` on `data`. The network's output width must equal the
    /// dataset's class count.
    pub fn evaluate(network: &Network, data: &Dataset) -> Result<ClassificationReport> {
        let outputs = network.layers.last().map_or(0, |l| l.size);
        if outputs != data.n_classes() {
            return Err(Error::ClassCount { expected: outputs, found: data.n_classes() });
        }
        if data.is_empty() {
            return Ok(ClassificationReport::from_predictions(&[], &[], data.n_classes()));
        }
        let probs = network.predict(&Matrix::from_data(data.features().to_vec()));
        Ok(ClassificationReport::from_predictions(&probs.argmax_rows(), data.labels(), data.n_classes()))
    }

    pub fn from_predictions(predicted: &[usize], actual: &[usize], n_classes: usize) -> ClassificationReport {
        let mut confusion = vec![vec![0usize; n_classes]; n_classes];
        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            confusion[a][p] += 1;
        }

        let total = actual.len();
        let correct: usize = (0..n_classes).map(|c| confusion[c][c]).sum();
        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

        let precision = (0..n_classes)
            .map(|c| ratio(confusion[c][c], (0..n_classes).map(|a| confusion[a][c]).sum()))
            .sum::<f64>();
        let recall = (0..n_classes)
            .map(|c| ratio(confusion[c][c], confusion[c].iter().sum()))
            .sum::<f64>();
        let classes = n_classes.max(1) as f64;

        ClassificationReport {
            accuracy: ratio(correct, total),
            precision: precision / classes,
            recall: recall / classes,
            confusion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn macro_scores_match_hand_computed_values() {
        // actual:    0 0 1 1 2 2
        // predicted: 0 1 1 1 2 0
        let report = ClassificationReport::from_predictions(&[0, 1, 1, 1, 2, 0], &[0, 0, 1, 1, 2, 2], 3);
        assert_abs_diff_eq!(report.accuracy, 4.0 / 6.0, epsilon = 1e-12);
        // precision: c0 1/2, c1 2/3, c2 1/1
        assert_abs_diff_eq!(report.precision, (0.5 + 2.0 / 3.0 + 1.0) / 3.0, epsilon = 1e-12);
        // recall: c0 1/2, c1 2/2, c2 1/2
        assert_abs_diff_eq!(report.recall, (0.5 + 1.0 + 0.5) / 3.0, epsilon = 1e-12);
        assert_eq!(report.confusion[2], vec![1, 0, 1]);
    }

    #[test]
    fn evaluate_rejects_class_count_mismatch() {
        use crate::network::spec::NetworkSpec;
        use rand::{rngs::StdRng, SeedableRng};

        let network = Network::new(&NetworkSpec::iris_classifier(), &mut StdRng::seed_from_u64(0));
        let five_way = Dataset::new(vec![vec![0.5; 4]; 5], vec![0, 1, 2, 3, 4], 5).unwrap();
        assert!(matches!(
            ClassificationReport::evaluate(&network, &five_way),
            Err(Error::ClassCount { expected: 3, found: 5 })
        ));

        let three_way = Dataset::new(vec![vec![0.5; 4]; 3], vec![0, 1, 2], 3).unwrap();
        assert_eq!(ClassificationReport::evaluate(&network, &three_way).unwrap().confusion.len(), 3);
    }

    #[test]
    fn unpredicted_class_scores_zero_precision() {
        let report = ClassificationReport::from_predictions(&[0, 0], &[0, 1], 2);
        assert_abs_diff_eq!(report.precision, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(report.recall, 0.5, epsilon = 1e-12);
    }
}
