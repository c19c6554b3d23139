pub mod checkpoint;
pub mod epoch_stats;
pub mod loop_fn;
pub mod train_config;
pub mod trainer;

pub use checkpoint::{Checkpoint, CheckpointSelector};
pub use epoch_stats::{EpochMetrics, EpochStats, Phase};
pub use loop_fn::{evaluate, train_epoch, train_loop, TrainOutcome};
pub use train_config::TrainConfig;
pub use trainer::{fit, FitResult};
