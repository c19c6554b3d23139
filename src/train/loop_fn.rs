use std::io::Write;
use std::time::Instant;

use rand::RngCore;

use crate::data::adapter::{TabularDataset, TensorSample, Transform};
use crate::data::loader::{Batch, DataLoader};
use crate::error::{Error, Result};
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::math::matrix::Matrix;
use crate::network::{mode::Mode, network::Network, parameters::ModelParameters};
use crate::optim::sgd::Sgd;
use crate::train::checkpoint::{Checkpoint, CheckpointSelector};
use crate::train::epoch_stats::{write_report_line, EpochMetrics, EpochStats, Phase};

/// Everything a `train_loop` run produced.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub history: Vec<EpochStats>,
    pub selector: CheckpointSelector,
}

impl TrainOutcome {
    pub fn best(&self) -> Option<&Checkpoint> {
        self.selector.checkpoint()
    }

    /// The checkpointed parameters, or `Error::NoCheckpoint` if validation
    /// accuracy never rose above zero.
    pub fn best_parameters(&self) -> Result<&ModelParameters> {
        self.best()
            .map(|c| &c.parameters)
            .ok_or(Error::NoCheckpoint { threshold: 0.0 })
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` for `epochs` epochs, evaluating on `validation` after
/// each one and keeping the best checkpoint.
///
/// One `Train(..)` and one `Validation(..)` line per epoch is written to
/// `out`. NaN losses are reported as they are; training does not stop.
#[allow(clippy::too_many_arguments)]
pub fn train_loop<T>(
    network: &mut Network,
    train: &TabularDataset<T>,
    train_loader: &DataLoader,
    validation: &TabularDataset<T>,
    validation_loader: &DataLoader,
    optimizer: &Sgd,
    epochs: usize,
    rng: &mut dyn RngCore,
    out: &mut dyn Write,
) -> Result<TrainOutcome>
where
    T: Transform<Output = TensorSample>,
{
    let mut selector = CheckpointSelector::new();
    let mut history = Vec::with_capacity(epochs);

    for epoch in 0..epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let train_metrics = train_epoch(network, train, train_loader, optimizer, rng)?;
        write_report_line(out, Phase::Train, epoch, &train_metrics)?;

        // ── Validation ────────────────────────────────────────────────────
        let val_metrics = evaluate(network, validation, validation_loader, rng)?;
        write_report_line(out, Phase::Validation, epoch, &val_metrics)?;

        if selector.observe(epoch, val_metrics.accuracy, network) {
            tracing::info!(epoch, accuracy = val_metrics.accuracy, "new best validation accuracy");
        }

        history.push(EpochStats {
            epoch,
            train: train_metrics,
            validation: val_metrics,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        });
    }

    Ok(TrainOutcome { history, selector })
}

/// Runs one full epoch of mini-batch SGD with dropout active.
pub fn train_epoch<T>(
    network: &mut Network,
    dataset: &TabularDataset<T>,
    loader: &DataLoader,
    optimizer: &Sgd,
    rng: &mut dyn RngCore,
) -> Result<EpochMetrics>
where
    T: Transform<Output = TensorSample>,
{
    let batches = loader.batches(dataset, rng)?;
    let mut acc = MetricAccumulator::default();

    for batch in &batches {
        // Gradients are built fresh for every batch, nothing carries over.
        let trace = network.forward(&batch.data, Mode::Train(&mut *rng));
        let probs = trace.output();
        let loss = CrossEntropyLoss::loss(probs, &batch.target);
        acc.record(probs, batch, loss);

        let grads = network.backward(&trace, CrossEntropyLoss::derivative(probs, &batch.target));
        optimizer.step(network, &grads);
    }

    Ok(acc.finish())
}

/// Computes loss and accuracy without touching parameters; dropout is off.
pub fn evaluate<T>(
    network: &Network,
    dataset: &TabularDataset<T>,
    loader: &DataLoader,
    rng: &mut dyn RngCore,
) -> Result<EpochMetrics>
where
    T: Transform<Output = TensorSample>,
{
    let mut acc = MetricAccumulator::default();
    for batch in loader.batches(dataset, rng)? {
        let probs = network.predict(&batch.data);
        let loss = CrossEntropyLoss::loss(&probs, &batch.target);
        acc.record(&probs, &batch, loss);
    }
    Ok(acc.finish())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Sums batch losses weighted by their true size so a trailing partial
/// batch counts exactly as much as its samples.
#[derive(Debug, Default)]
struct MetricAccumulator {
    loss_sum: f64,
    correct: usize,
    samples: usize,
    batches: usize,
}

impl MetricAccumulator {
    fn record(&mut self, probs: &Matrix, batch: &Batch, batch_loss: f64) {
        self.loss_sum += batch_loss * batch.len() as f64;
        self.correct += probs.argmax_rows().iter()
            .zip(batch.target.iter())
            .filter(|(pred, label)| pred == label)
            .count();
        self.samples += batch.len();
        self.batches += 1;
    }

    fn finish(self) -> EpochMetrics {
        if self.samples == 0 {
            return EpochMetrics { loss: 0.0, accuracy: 0.0, batches: self.batches, samples: 0 };
        }
        let n = self.samples as f64;
        EpochMetrics {
            loss: self.loss_sum / n,
            accuracy: 100.0 * self.correct as f64 / n,
            batches: self.batches,
            samples: self.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::Dataset;
    use crate::network::spec::NetworkSpec;
    use rand::{rngs::StdRng, SeedableRng};

    fn separable(n: usize) -> TabularDataset {
        let features = (0..n)
            .map(|i| {
                let mut row = vec![0.1; 4];
                row[i % 3] = 1.0;
                row
            })
            .collect();
        TabularDataset::new(Dataset::new(features, (0..n).map(|i| i % 3).collect(), 3).unwrap())
    }

    #[test]
    fn train_epoch_counts_every_sample_including_partial_batch() {
        let mut rng = StdRng::seed_from_u64(29);
        let mut network = Network::new(&NetworkSpec::iris_classifier(), &mut rng);
        let metrics = train_epoch(
            &mut network, &separable(13), &DataLoader::new(4).shuffle(true), &Sgd::new(0.01), &mut rng,
        ).unwrap();
        assert_eq!(metrics.batches, 4);
        assert_eq!(metrics.samples, 13);
        assert!(metrics.loss >= 0.0);
        assert!((0.0..=100.0).contains(&metrics.accuracy));
    }

    #[test]
    fn train_epoch_updates_parameters() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut network = Network::new(&NetworkSpec::iris_classifier(), &mut rng);
        let before = network.state_dict();
        train_epoch(&mut network, &separable(6), &DataLoader::new(3), &Sgd::new(0.1), &mut rng).unwrap();
        assert_ne!(network.state_dict(), before);
    }

    #[test]
    fn evaluate_is_idempotent_and_leaves_parameters_alone() {
        let mut rng = StdRng::seed_from_u64(2);
        let network = Network::new(&NetworkSpec::iris_classifier(), &mut rng);
        let before = network.state_dict();
        let data = separable(9);
        let loader = DataLoader::new(4);
        let first = evaluate(&network, &data, &loader, &mut rng).unwrap();
        let second = evaluate(&network, &data, &loader, &mut rng).unwrap();
        assert_eq!(first, second);
        assert_eq!(network.state_dict(), before);
    }

    #[test]
    fn partial_batch_loss_is_weighted_by_its_size() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = Network::new(&NetworkSpec::iris_classifier(), &mut rng);
        let data = separable(5);
        let whole = evaluate(&network, &data, &DataLoader::new(5), &mut rng).unwrap();
        let split = evaluate(&network, &data, &DataLoader::new(2), &mut rng).unwrap();
        assert_eq!(split.batches, 3);
        assert!((whole.loss - split.loss).abs() < 1e-12);
        assert_eq!(whole.accuracy, split.accuracy);
    }

    #[test]
    fn learns_a_separable_problem() {
        let mut rng = StdRng::seed_from_u64(29);
        let mut network = Network::new(&NetworkSpec::iris_classifier(), &mut rng);
        let data = separable(30);
        let loader = DataLoader::new(10).shuffle(true);
        let start = evaluate(&network, &data, &DataLoader::new(10), &mut rng).unwrap();
        for _ in 0..200 {
            train_epoch(&mut network, &data, &loader, &Sgd::new(0.1), &mut rng).unwrap();
        }
        let end = evaluate(&network, &data, &DataLoader::new(10), &mut rng).unwrap();
        assert!(end.loss < start.loss);
        assert_eq!(end.accuracy, 100.0);
    }

    #[test]
    fn train_loop_writes_two_lines_per_epoch_and_tracks_best() {
        let mut rng = StdRng::seed_from_u64(29);
        let mut network = Network::new(&NetworkSpec::iris_classifier(), &mut rng);
        let mut out = Vec::new();
        let outcome = train_loop(
            &mut network,
            &separable(12), &DataLoader::new(4).shuffle(true),
            &separable(6), &DataLoader::new(4),
            &Sgd::new(0.05), 3, &mut rng, &mut out,
        ).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Train(0): Loss: "));
        assert!(lines[1].starts_with("Validation(0): Loss: "));
        assert!(lines[5].starts_with("Validation(2): "));
        assert_eq!(outcome.history.len(), 3);

        let best_seen = outcome.history.iter().map(|s| s.validation.accuracy).fold(0.0, f64::max);
        assert_eq!(outcome.selector.best_accuracy(), best_seen);
        assert_eq!(outcome.best().is_some(), best_seen > 0.0);
    }

    #[test]
    fn missing_checkpoint_is_reported_as_error() {
        let outcome = TrainOutcome { history: vec![], selector: CheckpointSelector::new() };
        assert!(matches!(outcome.best_parameters(), Err(Error::NoCheckpoint { .. })));
    }
}
