//! Pipeline configuration, read from TOML with defaults for every key.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::data::separator_byte;
use crate::encoding::LabelOrder;
use crate::error::{PipelineError, Result};
use crate::features::Normalization;
use crate::sdca::{LossConfig, SdcaClassifier};

/// Names a TOML file to load the configuration from.
pub const CONFIG_ENV: &str = "IRIS_PIPELINE_CONFIG";
/// Overrides `data_path`.
pub const DATA_PATH_ENV: &str = "IRIS_DATA_PATH";

const DEFAULT_DATA_PATH: &str = "data/iris-data.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Training file, one record per line.
    pub data_path: PathBuf,
    /// Single-character field separator.
    pub separator: char,
    pub label_order: LabelOrder,
    pub normalization: Normalization,
    /// Number of ranked candidates attached to each prediction.
    pub top_k: usize,
    pub trainer: TrainerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    pub l2_regularization: f64,
    pub loss: LossFunction,
    pub convergence_tolerance: f64,
    pub max_epochs: usize,
    pub shuffle: bool,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LossFunction {
    Log,
    SmoothedHinge { smoothing: f64 },
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            separator: ',',
            label_order: LabelOrder::FirstSeen,
            normalization: Normalization::MaxAbs,
            top_k: 3,
            trainer: TrainerConfig::default(),
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            l2_regularization: 1e-3,
            loss: LossFunction::Log,
            convergence_tolerance: 1e-3,
            max_epochs: 200,
            shuffle: true,
            seed: SdcaClassifier::<f32>::DEFAULT_SEED,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PipelineConfig =
            toml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("loaded pipeline configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Defaults, or the file named by `IRIS_PIPELINE_CONFIG`, with
    /// `IRIS_DATA_PATH` applied on top.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path))?,
            None => Self::default(),
        };
        if let Some(path) = env::var_os(DATA_PATH_ENV) {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        separator_byte(self.separator)?;
        self.trainer.validate()
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.l2_regularization > 0.0 && self.l2_regularization.is_finite()) {
            return Err(PipelineError::Config(format!(
                "l2_regularization must be positive, got {}",
                self.l2_regularization
            )));
        }
        if !(self.convergence_tolerance > 0.0 && self.convergence_tolerance.is_finite()) {
            return Err(PipelineError::Config(format!(
                "convergence_tolerance must be positive, got {}",
                self.convergence_tolerance
            )));
        }
        if self.max_epochs == 0 {
            return Err(PipelineError::Config("max_epochs must be at least 1".into()));
        }
        if let LossFunction::SmoothedHinge { smoothing } = self.loss {
            if !(smoothing >= 0.0 && smoothing.is_finite()) {
                return Err(PipelineError::Config(format!(
                    "smoothing must be non-negative, got {smoothing}"
                )));
            }
        }
        Ok(())
    }

    /// Builds the trainer. Call [`TrainerConfig::validate`] first; the
    /// classifier constructor panics on out-of-range values.
    pub fn classifier(&self) -> SdcaClassifier<f32> {
        let loss = match self.loss {
            LossFunction::Log => LossConfig::Log,
            LossFunction::SmoothedHinge { smoothing } => LossConfig::SmoothedHinge {
                smoothing: smoothing as f32,
            },
        };
        SdcaClassifier::new(
            self.l2_regularization as f32,
            loss,
            self.convergence_tolerance as f32,
            self.max_epochs,
        )
        .with_seed(self.seed)
        .with_shuffle(self.shuffle)
    }
}
