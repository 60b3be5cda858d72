//! The fixed training pipeline: load, encode labels, assemble and normalize
//! features, fit the classifier, and wrap it in a label decoder.

pub mod decoder;
pub mod model;

pub use decoder::{CodePrediction, CodePredictor, LabelDecoder, Prediction, RankedLabel};
pub use model::TrainedModel;

use std::path::Path;

use log::info;

use crate::common_types::DataPoint;
use crate::config::PipelineConfig;
use crate::data::{IrisRecord, Schema, load_records};
use crate::encoding::encode_labels;
use crate::error::{PipelineError, Result};
use crate::features::{FeatureVector, Normalizer, assemble};

/// A trained model whose predictions are decoded label strings.
pub type TrainedPipeline = LabelDecoder<TrainedModel>;

/// Immutable description of a training run. Each call to [`Pipeline::train`]
/// runs every stage exactly once.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    schema: Schema,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline {
            config,
            schema: Schema::iris(),
        })
    }

    /// Reads the training files with a different column layout.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads the records of `path` using the configured schema and separator.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Vec<IrisRecord>> {
        load_records(path, self.schema.clone(), self.config.separator)
    }

    pub fn train_from_path(&self, path: impl AsRef<Path>) -> Result<TrainedPipeline> {
        let records = self.load(path)?;
        self.train(&records)
    }

    pub fn train(&self, records: &[IrisRecord]) -> Result<TrainedPipeline> {
        if records.is_empty() {
            return Err(PipelineError::Training("no training records".into()));
        }

        let (label_map, codes) = encode_labels(records, self.config.label_order);
        if label_map.len() < 2 {
            return Err(PipelineError::Training(format!(
                "all {} records share the label {:?}",
                records.len(),
                label_map.labels().first().map_or("", String::as_str)
            )));
        }

        let vectors: Vec<FeatureVector> = records.iter().map(assemble).collect();
        let normalizer = Normalizer::fit(&vectors, self.config.normalization);
        let training_data: Vec<DataPoint<f32, usize>> = vectors
            .iter()
            .zip(codes)
            .map(|(vector, code)| DataPoint::new(normalizer.transform(vector).to_vec(), code))
            .collect();

        let classifier = self.config.trainer.classifier().fit(&training_data)?;
        info!(
            "trained on {} records with labels {:?} ({} epochs, converged: {})",
            records.len(),
            label_map.labels(),
            classifier.epochs_run(),
            classifier.converged()
        );

        Ok(LabelDecoder::new(
            TrainedModel::new(normalizer, classifier),
            label_map,
            self.config.top_k,
        ))
    }
}
