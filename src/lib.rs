pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod metrics;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Mode, ModelParameters, Network, NetworkSpec};
pub use loss::cross_entropy::CrossEntropyLoss;
pub use optim::sgd::Sgd;
pub use data::{DataLoader, Dataset, Normalizer, TabularDataset};
pub use train::{fit, TrainConfig};
pub use metrics::ClassificationReport;
pub use error::{Error, Result};
