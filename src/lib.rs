//! Iris species classification: a fixed pipeline that loads delimited
//! measurements, encodes the species labels, assembles and normalizes the
//! four numeric features, trains a linear classifier with stochastic dual
//! coordinate ascent and decodes its predictions back to species names.
//!
//! ```no_run
//! use iris_pipeline::{FeatureVector, Pipeline, PipelineConfig};
//!
//! # fn main() -> iris_pipeline::Result<()> {
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let trained = pipeline.train_from_path("data/iris-data.txt")?;
//! let prediction = trained.predict(&FeatureVector::new(5.1, 3.5, 1.4, 0.2)?)?;
//! println!("{}", prediction.label);
//! # Ok(())
//! # }
//! ```

// Declare your pipeline modules
pub mod common_types;
pub mod config;
pub mod data;
pub mod encoding;
pub mod error;
pub mod features;
pub mod metrics;
pub mod pipeline;
pub mod sdca;

#[cfg(feature = "python")]
mod python;

pub use common_types::DataPoint;
pub use config::{PipelineConfig, TrainerConfig};
pub use data::{IrisRecord, Schema};
pub use encoding::{LabelMap, LabelOrder};
pub use error::{PipelineError, Result};
pub use features::{FeatureVector, Normalization};
pub use metrics::{ClassificationMetrics, evaluate};
pub use pipeline::{Pipeline, Prediction, TrainedPipeline};
