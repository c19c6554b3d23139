use crate::{
    data::dataset::Dataset,
    error::{Error, Result},
};

/// Row-wise L2 normalizer: scales every feature vector to unit Euclidean
/// norm. Rows whose norm is zero are passed through unchanged.
///
/// The transform holds no statistics beyond the feature width seen in
/// `fit`, so fitting on the training partition and applying the same
/// instance to validation data cannot leak information between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    n_features: usize,
}

impl Normalizer {
    pub fn fit(train: &Dataset) -> Result<Normalizer> {
        if train.is_empty() {
            return Err(Error::EmptyDataset);
        }
        Ok(Normalizer { n_features: train.n_features() })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            return row.to_vec();
        }
        row.iter().map(|x| x / norm).collect()
    }

    pub fn transform(&self, data: &Dataset) -> Result<Dataset> {
        if !data.is_empty() && data.n_features() != self.n_features {
            return Err(Error::FeatureCount {
                row: 0,
                expected: self.n_features,
                found: data.n_features(),
            });
        }
        data.map_features(|row| self.transform_row(row))
    }
}
