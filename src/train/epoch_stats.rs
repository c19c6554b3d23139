use std::fmt;
use std::io::Write;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Loss and accuracy of one pass over a partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Mean per-sample loss.
    pub loss: f64,
    /// Percentage of correct top-1 predictions, in [0, 100].
    pub accuracy: f64,
    pub batches: usize,
    pub samples: usize,
}

/// Per-epoch record kept by `train_loop`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch number.
    pub epoch: usize,
    pub train: EpochMetrics,
    pub validation: EpochMetrics,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Train,
    Validation,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Train => f.write_str("Train"),
            Phase::Validation => f.write_str("Validation"),
        }
    }
}

/// Writes `<Phase>(<epoch>): Loss: <loss>, Accuracy: <acc>%`.
pub fn write_report_line(
    out: &mut dyn Write,
    phase: Phase,
    epoch: usize,
    metrics: &EpochMetrics,
) -> Result<()> {
    writeln!(
        out,
        "{}({}): Loss: {:.4}, Accuracy: {:.4}%",
        phase, epoch, metrics.loss, metrics.accuracy
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_line_uses_four_decimals() {
        let metrics = EpochMetrics { loss: 0.123456, accuracy: 87.5, batches: 3, samples: 24 };
        let mut out = Vec::new();
        write_report_line(&mut out, Phase::Validation, 7, &metrics).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Validation(7): Loss: 0.1235, Accuracy: 87.5000%\n");
    }

    #[test]
    fn nan_loss_is_printed_not_rejected() {
        let metrics = EpochMetrics { loss: f64::NAN, accuracy: 0.0, batches: 1, samples: 1 };
        let mut out = Vec::new();
        write_report_line(&mut out, Phase::Train, 0, &metrics).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Train(0): Loss: NaN, Accuracy: 0.0000%\n");
    }
}
