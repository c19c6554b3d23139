use crate::network::{network::Network, parameters::ModelParameters};

/// Parameters captured at the epoch with the best validation accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub epoch: usize,
    pub accuracy: f64,
    pub parameters: ModelParameters,
}

/// Tracks the best validation accuracy across epochs and snapshots the
/// model whenever it is strictly beaten.
#[derive(Debug, Clone, Default)]
pub struct CheckpointSelector {
    best_accuracy: f64,
    best_epoch: Option<usize>,
    checkpoint: Option<Checkpoint>,
}

impl CheckpointSelector {
    pub fn new() -> CheckpointSelector {
        CheckpointSelector::default()
    }

    /// Records one epoch's validation accuracy. Returns `true` when it beat
    /// the previous best and a new checkpoint was taken.
    pub fn observe(&mut self, epoch: usize, accuracy: f64, network: &Network) -> bool {
        if accuracy <= self.best_accuracy {
            return false;
        }
        self.best_accuracy = accuracy;
        self.best_epoch = Some(epoch);
        self.checkpoint = Some(Checkpoint {
            epoch,
            accuracy,
            parameters: network.state_dict(),
        });
        true
    }

    pub fn best_accuracy(&self) -> f64 {
        self.best_accuracy
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    pub fn checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoint.as_ref()
    }

    pub fn into_checkpoint(self) -> Option<Checkpoint> {
        self.checkpoint
    }
}
