use std::io::Write;
use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    data::{
        adapter::TabularDataset,
        dataset::Dataset,
        loader::DataLoader,
        normalizer::Normalizer,
    },
    error::{Error, Result},
    network::{network::Network, spec::NetworkSpec},
    optim::sgd::Sgd,
    train::{
        loop_fn::{train_loop, TrainOutcome},
        train_config::TrainConfig,
    },
};

/// Result of `fit`: the training record plus the normalized partitions it
/// was computed on.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub outcome: TrainOutcome,
    pub network: Network,
    pub train: Dataset,
    pub validation: Dataset,
    pub normalizer: Normalizer,
}

/// Runs the whole pipeline on `dataset`: split, normalize, build the
/// network, then train and evaluate for `config.epochs` epochs.
///
/// All randomness comes from one `StdRng` seeded with `config.seed`, drawn
/// in this order: split, weight init, then per-epoch shuffles and dropout.
pub fn fit(
    config: &TrainConfig,
    dataset: &Dataset,
    spec: &NetworkSpec,
    out: &mut dyn Write,
) -> Result<FitResult> {
    spec.validate()?;
    if dataset.n_features() != spec.input_size() {
        return Err(Error::FeatureCount {
            row: 0,
            expected: spec.input_size(),
            found: dataset.n_features(),
        });
    }
    if dataset.n_classes() != spec.output_size() {
        return Err(Error::ClassCount {
            expected: spec.output_size(),
            found: dataset.n_classes(),
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let (train_raw, val_raw) = dataset.split(config.validation_fraction, &mut rng)?;
    let normalizer = Normalizer::fit(&train_raw)?;
    let train = normalizer.transform(&train_raw)?;
    let validation = normalizer.transform(&val_raw)?;

    let train_set = TabularDataset::new(train.clone());
    let val_set = TabularDataset::new(validation.clone());
    let train_loader = DataLoader::new(config.batch_size)
        .shuffle(true)
        .drop_last(config.drop_last);
    let val_loader = DataLoader::new(config.batch_size);

    let mut network = Network::new(spec, &mut rng);
    let optimizer = Sgd::new(config.learning_rate);

    tracing::info!("Starting training for {} epochs", config.epochs);
    tracing::info!("Training examples: {}", train.len());
    tracing::info!("Validation examples: {}", validation.len());
    tracing::info!("Model parameters: {}", network.num_parameters());

    let start_time = Instant::now();
    let outcome = train_loop(
        &mut network,
        &train_set,
        &train_loader,
        &val_set,
        &val_loader,
        &optimizer,
        config.epochs,
        &mut rng,
        out,
    )?;
    tracing::info!("Training complete! Total time: {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(FitResult { outcome, network, train, validation, normalizer })
}
