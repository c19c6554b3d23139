pub mod adapter;
pub mod dataset;
pub mod iris;
pub mod loader;
pub mod normalizer;

pub use adapter::{IntoSampleIndex, Sample, TabularDataset, TensorSample, ToTensor, Transform};
pub use dataset::Dataset;
pub use loader::{Batch, DataLoader};
pub use normalizer::Normalizer;
