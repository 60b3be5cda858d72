use super::decoder::{CodePrediction, CodePredictor};
use crate::error::{PipelineError, Result};
use crate::features::{FeatureVector, Normalizer};
use crate::sdca::{SdcaModel, argmax};

/// Fitted normalizer and classifier. Prediction only reads it, so a shared
/// reference can serve any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    normalizer: Normalizer,
    classifier: SdcaModel<f32>,
}

impl TrainedModel {
    pub fn new(normalizer: Normalizer, classifier: SdcaModel<f32>) -> Self {
        TrainedModel { normalizer, classifier }
    }
}

impl CodePredictor for TrainedModel {
    fn predict_code(&self, features: &FeatureVector) -> Result<CodePrediction> {
        let normalized = self.normalizer.transform(features);
        let probabilities = self.classifier.predict_proba(&normalized)?;
        let ranked: Vec<f64> = probabilities.iter().map(|&p| f64::from(p)).collect();
        let code = argmax(&ranked).ok_or_else(|| PipelineError::InvalidInput("model has no classes".into()))?;
        Ok(CodePrediction { code, probabilities })
    }
}
