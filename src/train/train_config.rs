use serde::{Serialize, Deserialize};

/// Hyperparameters for a training run.
///
/// # Fields
/// - `epochs`              — total number of full passes over the training data
/// - `learning_rate`       — fixed SGD step size
/// - `batch_size`          — samples per mini-batch; use `1` for online SGD
/// - `seed`                — seeds the single RNG behind the split, weight
///                           init, batch shuffling and dropout masks
/// - `validation_fraction` — share of the dataset held out for validation
/// - `drop_last`           — discard a trailing partial training batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub seed: u64,
    pub validation_fraction: f64,
    pub drop_last: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, batch_size: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            learning_rate,
            ..TrainConfig::default()
        }
    }
}

impl Default for TrainConfig {
    /// The settings the iris script runs with.
    fn default() -> Self {
        TrainConfig {
            epochs: 500,
            learning_rate: 0.01,
            batch_size: 10,
            seed: 29,
            validation_fraction: 0.2,
            drop_last: false,
        }
    }
}
