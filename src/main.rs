use anyhow::Context;
use log::{debug, info};

use iris_pipeline::{FeatureVector, Pipeline, PipelineConfig, evaluate};

/// The measurements classified on every run.
const SAMPLE: [f32; 4] = [3.3, 1.6, 0.2, 5.1];

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PipelineConfig::from_env().context("reading configuration")?;
    let pipeline = Pipeline::new(config).context("validating configuration")?;
    let data_path = pipeline.config().data_path.clone();

    let records = pipeline
        .load(&data_path)
        .with_context(|| format!("loading dataset {}", data_path.display()))?;
    let trained = pipeline.train(&records).context("training classifier")?;

    let metrics = evaluate(&trained, &records).context("evaluating classifier")?;
    info!(
        "training accuracy {:.3} (macro {:.3}), log-loss {:.4}",
        metrics.accuracy_micro, metrics.accuracy_macro, metrics.log_loss
    );

    let [sepal_length, sepal_width, petal_length, petal_width] = SAMPLE;
    let input = FeatureVector::new(sepal_length, sepal_width, petal_length, petal_width)
        .context("building prediction input")?;
    let prediction = trained.predict(&input).context("predicting")?;
    for candidate in &prediction.candidates {
        debug!("{}: {:.4}", candidate.label, candidate.probability);
    }

    println!("Predicted flower type is: {}", prediction.label);
    Ok(())
}
