use rand::{seq::SliceRandom, Rng};

use crate::error::{Error, Result};

/// Feature rows with index-aligned integer class labels.
///
/// Construction validates the invariants every consumer relies on: equal
/// lengths, a single feature width, and labels inside `0..n_classes`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl Dataset {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<usize>, n_classes: usize) -> Result<Dataset> {
        if features.len() != labels.len() {
            return Err(Error::LengthMismatch { features: features.len(), labels: labels.len() });
        }
        if let Some(first) = features.first() {
            let expected = first.len();
            for (row, f) in features.iter().enumerate() {
                if f.len() != expected {
                    return Err(Error::FeatureCount { row, expected, found: f.len() });
                }
            }
        }
        for (row, &label) in labels.iter().enumerate() {
            if label >= n_classes {
                return Err(Error::LabelOutOfRange { row, label, n_classes });
            }
        }
        Ok(Dataset { features, labels, n_classes })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.features.first().map_or(0, Vec::len)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }

    /// Returns a copy with every feature row replaced by `f(row)`.
    pub fn map_features<F>(&self, f: F) -> Result<Dataset>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        Dataset::new(
            self.features.iter().map(|row| f(row)).collect(),
            self.labels.clone(),
            self.n_classes,
        )
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: indices.iter().map(|&i| self.features[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            n_classes: self.n_classes,
        }
    }

    /// Randomly partitions into `(train, validation)`.
    ///
    /// The validation partition gets `ceil(len × validation_fraction)` rows
    /// drawn from a random permutation; the rest go to training. Both
    /// partitions must end up non-empty.
    pub fn split<R: Rng + ?Sized>(
        &self,
        validation_fraction: f64,
        rng: &mut R,
    ) -> Result<(Dataset, Dataset)> {
        let n = self.len();
        let n_val = ((n as f64) * validation_fraction).ceil() as usize;
        if n_val == 0 || n_val >= n {
            return Err(Error::EmptyDataset);
        }

        let mut permutation: Vec<usize> = (0..n).collect();
        permutation.shuffle(rng);
        let (val_idx, train_idx) = permutation.split_at(n_val);

        Ok((self.select(train_idx), self.select(val_idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn toy(n: usize) -> Dataset {
        Dataset::new(
            (0..n).map(|i| vec![i as f64, 1.0]).collect(),
            (0..n).map(|i| i % 3).collect(),
            3,
        ).unwrap()
    }

    #[test]
    fn new_rejects_inconsistent_inputs() {
        assert!(matches!(
            Dataset::new(vec![vec![1.0]], vec![0, 1], 2),
            Err(Error::LengthMismatch { features: 1, labels: 2 })
        ));
        assert!(matches!(
            Dataset::new(vec![vec![1.0], vec![1.0, 2.0]], vec![0, 1], 2),
            Err(Error::FeatureCount { row: 1, expected: 1, found: 2 })
        ));
        assert!(matches!(
            Dataset::new(vec![vec![1.0]], vec![3], 3),
            Err(Error::LabelOutOfRange { row: 0, label: 3, n_classes: 3 })
        ));
    }

    #[test]
    fn split_rounds_validation_size_up() {
        let mut rng = StdRng::seed_from_u64(29);
        let (train, val) = toy(150).split(0.2, &mut rng).unwrap();
        assert_eq!((train.len(), val.len()), (120, 30));

        let (train, val) = toy(12).split(0.3, &mut rng).unwrap();
        assert_eq!((train.len(), val.len()), (8, 4));
    }

    #[test]
    fn split_is_a_partition_and_seed_dependent() {
        let data = toy(20);
        let (train, val) = data.split(0.25, &mut StdRng::seed_from_u64(1)).unwrap();
        let mut seen: Vec<f64> = train.features().iter().chain(val.features()).map(|r| r[0]).collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, (0..20).map(|i| i as f64).collect::<Vec<_>>());

        let (again, _) = data.split(0.25, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(train, again);
    }

    #[test]
    fn split_refuses_to_leave_a_partition_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(toy(3).split(0.0, &mut rng), Err(Error::EmptyDataset)));
        assert!(matches!(toy(3).split(1.0, &mut rng), Err(Error::EmptyDataset)));
    }
}
