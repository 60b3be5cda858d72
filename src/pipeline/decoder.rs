//! Turns predicted class codes back into label strings.

use crate::encoding::LabelMap;
use crate::error::Result;
use crate::features::FeatureVector;
use crate::sdca::top_k;

/// Raw output of a model: the winning code and the probability of every code.
#[derive(Debug, Clone, PartialEq)]
pub struct CodePrediction {
    pub code: usize,
    pub probabilities: Vec<f32>,
}

/// Anything that maps a feature vector to a class code.
pub trait CodePredictor {
    fn predict_code(&self, features: &FeatureVector) -> Result<CodePrediction>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedLabel {
    pub label: String,
    pub probability: f32,
}

/// A decoded prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    /// Probability of `label`.
    pub confidence: f32,
    /// Best labels first, at most `top_k` of them.
    pub candidates: Vec<RankedLabel>,
}

/// Wraps a model so that its predictions come out as label strings.
#[derive(Debug, Clone)]
pub struct LabelDecoder<M> {
    model: M,
    label_map: LabelMap,
    top_k: usize,
}

impl<M: CodePredictor> LabelDecoder<M> {
    pub fn new(model: M, label_map: LabelMap, top_k: usize) -> Self {
        LabelDecoder {
            model,
            label_map,
            top_k,
        }
    }

    /// Predicts one vector. A code the label map does not know is reported as
    /// [`crate::PipelineError::UnknownLabel`].
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let output = self.model.predict_code(features)?;
        let label = self.label_map.decode(output.code)?.to_string();
        let confidence = output.probabilities.get(output.code).copied().unwrap_or(0.0);

        let probabilities: Vec<f64> = output.probabilities.iter().map(|&p| f64::from(p)).collect();
        let candidates = top_k(&probabilities, self.top_k)
            .into_iter()
            .map(|ranked| {
                Ok(RankedLabel {
                    label: self.label_map.decode(ranked.code)?.to_string(),
                    probability: ranked.score.0 as f32,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Prediction {
            label,
            confidence,
            candidates,
        })
    }

    /// Predicts every vector in order, stopping at the first failure.
    pub fn predict_batch(&self, batch: &[FeatureVector]) -> Result<Vec<Prediction>> {
        batch.iter().map(|features| self.predict(features)).collect()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.label_map
    }
}
