//! Multi-class evaluation of a trained pipeline.

use log::debug;

use crate::data::IrisRecord;
use crate::error::{PipelineError, Result};
use crate::features::assemble;
use crate::pipeline::{CodePredictor, LabelDecoder};

/// Smallest probability used when taking logarithms.
const MIN_PROBABILITY: f64 = 1e-15;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationMetrics {
    /// Fraction of records predicted correctly.
    pub accuracy_micro: f64,
    /// Mean per-class recall over the classes present in the records.
    pub accuracy_macro: f64,
    /// Mean negative log-probability of the true label.
    pub log_loss: f64,
    /// `confusion[truth][predicted]`, indexed by label code.
    pub confusion: Vec<Vec<usize>>,
}

/// Scores `records` with `pipeline`. Fails on labels the pipeline never saw.
pub fn evaluate<M: CodePredictor>(pipeline: &LabelDecoder<M>, records: &[IrisRecord]) -> Result<ClassificationMetrics> {
    if records.is_empty() {
        return Err(PipelineError::InvalidInput("no records to evaluate".into()));
    }

    let n_classes = pipeline.label_map().len();
    let mut confusion = vec![vec![0usize; n_classes]; n_classes];
    let mut log_loss = 0.0;

    for record in records {
        let truth = pipeline
            .label_map()
            .encode(&record.label)
            .ok_or_else(|| PipelineError::UnseenLabel(record.label.clone()))?;
        let output = pipeline.model().predict_code(&assemble(record))?;
        // Decoding guards against codes outside the label map.
        pipeline.label_map().decode(output.code)?;

        confusion[truth][output.code] += 1;
        let p = output.probabilities.get(truth).copied().map_or(0.0, f64::from);
        log_loss -= p.max(MIN_PROBABILITY).ln();
    }

    let total = records.len() as f64;
    let correct: usize = (0..n_classes).map(|c| confusion[c][c]).sum();
    let recalls: Vec<f64> = confusion
        .iter()
        .enumerate()
        .filter_map(|(c, row)| {
            let support: usize = row.iter().sum();
            (support > 0).then(|| row[c] as f64 / support as f64)
        })
        .collect();

    let metrics = ClassificationMetrics {
        accuracy_micro: correct as f64 / total,
        accuracy_macro: recalls.iter().sum::<f64>() / recalls.len() as f64,
        log_loss: log_loss / total,
        confusion,
    };
    debug!("evaluation over {} records: {:?}", records.len(), metrics);
    Ok(metrics)
}
