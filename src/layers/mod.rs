pub mod dense;
pub mod dropout;

pub use dense::{Layer, LayerCache, LayerGradients};
pub use dropout::Dropout;
