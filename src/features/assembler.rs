//! Concatenation of the numeric record fields into a feature vector.

use crate::data::{FEATURE_COUNT, IrisRecord};
use crate::error::{PipelineError, Result};

/// Feature names in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["SepalLength", "SepalWidth", "PetalLength", "PetalWidth"];

/// Exactly four finite values: sepal length, sepal width, petal length, petal width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; FEATURE_COUNT]);

impl FeatureVector {
    /// Builds a vector from caller-supplied measurements, rejecting NaN and
    /// infinities.
    pub fn new(sepal_length: f32, sepal_width: f32, petal_length: f32, petal_width: f32) -> Result<Self> {
        Self::try_from_slice(&[sepal_length, sepal_width, petal_length, petal_width])
    }

    pub fn try_from_slice(values: &[f32]) -> Result<Self> {
        let values: [f32; FEATURE_COUNT] = values.try_into().map_err(|_| {
            PipelineError::InvalidInput(format!(
                "expected {FEATURE_COUNT} features, got {}",
                values.len()
            ))
        })?;
        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidInput(format!(
                "{} is not finite ({})",
                FEATURE_NAMES[position], values[position]
            )));
        }
        Ok(FeatureVector(values))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn to_array(self) -> [f32; FEATURE_COUNT] {
        self.0
    }
}

/// Builds the feature vector of a loaded record. Loader output is already
/// finite, so this cannot fail.
pub fn assemble(record: &IrisRecord) -> FeatureVector {
    FeatureVector([
        record.sepal_length,
        record.sepal_width,
        record.petal_length,
        record.petal_width,
    ])
}
