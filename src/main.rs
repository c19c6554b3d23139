// Trains the iris classifier with the fixed script settings, prints one
// Train/Validation line per epoch, then the best checkpoint and how the
// restored model scores on the validation partition.
use std::io::{self, Write};

use anyhow::Result;
use iris_nn::{
    data::iris::{load_iris, CLASS_NAMES},
    fit, ClassificationReport, Network, NetworkSpec, TrainConfig,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("iris_nn=info")),
        )
        .init();

    let config = TrainConfig::default();
    tracing::debug!("config: {}", serde_json::to_string(&config)?);

    let iris = load_iris()?;
    tracing::info!("Loaded {} iris samples ({})", iris.len(), CLASS_NAMES.join(", "));

    let spec = NetworkSpec::iris_classifier();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let run = fit(&config, &iris, &spec, &mut out)?;

    let best = run.outcome.best();
    let best_epoch = best.map_or_else(|| "None".to_string(), |c| c.epoch.to_string());
    writeln!(out, "Best Epoch: {}, Best Accuracy: {}", best_epoch, run.outcome.selector.best_accuracy())?;

    let parameters = run.outcome.best_parameters()?;
    writeln!(out, "Model_state_dict: {}", serde_json::to_string_pretty(parameters)?)?;

    let best_model = Network::from_parameters(&spec, parameters)?;
    let report = ClassificationReport::evaluate(&best_model, &run.validation)?;
    writeln!(
        out,
        "Restored model: accuracy {:.4}, precision {:.4}, recall {:.4}",
        report.accuracy, report.precision, report.recall
    )?;

    Ok(())
}
