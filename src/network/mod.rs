pub mod mode;
pub mod network;
pub mod parameters;
pub mod spec;

pub use mode::Mode;
pub use network::{ForwardTrace, Network};
pub use parameters::ModelParameters;
pub use spec::{NetworkSpec, LayerSpec};
