//! Linear multi-class classifier trained with stochastic dual coordinate ascent.

use crate::common_types::DataPoint;
use crate::error::{PipelineError, Result};
use super::loss::LossConfig;
use super::ranking;
use log::{debug, info, trace, warn};
use num_traits::{AsPrimitive, Float, FromPrimitive};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt::Debug;

// --- Helper for dot product ---
fn dot_product_generic<F: Float + std::iter::Sum>(a: &[F], b: &[F]) -> F {
    a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum()
}

/// Softmax of `scores`, shifted by the maximum so large scores do not overflow.
pub fn softmax<F: Float + std::iter::Sum>(scores: &[F]) -> Vec<F> {
    let max = scores.iter().fold(F::neg_infinity(), |acc, &s| acc.max(s));
    let exps: Vec<F> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: F = exps.iter().copied().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// Stochastic Dual Coordinate Ascent (SDCA) trainer.
///
/// Fits one linear scorer per class (one-vs-rest) by maximising the dual of
/// the L2-regularised loss one coordinate at a time. For every sample the
/// dual variables of all classes are updated in turn and each weight vector
/// is kept equal to `sum_i alpha_i * x_i / (lambda * n)`. A constant feature
/// of value one is appended to every sample so the last weight acts as bias.
///
/// Training stops once the relative duality gap (summed over classes) drops
/// below `convergence_tolerance`, or after `max_epochs` passes.
#[derive(Debug, Clone)]
pub struct SdcaClassifier<F: Float> {
    /// L2 regularization strength (lambda).
    pub l2_regularization: F,
    pub loss: LossConfig<F>,
    /// Relative duality gap at which training stops.
    pub convergence_tolerance: F,
    /// Maximum number of passes over the data.
    pub max_epochs: usize,
    /// Visit samples in a freshly shuffled order every epoch.
    pub shuffle: bool,
    /// Seed of the shuffling RNG; equal seeds give identical models.
    pub seed: u64,
}

/// Weights learned by [`SdcaClassifier::fit`]. Immutable and read-only at
/// prediction time.
#[derive(Debug, Clone, PartialEq)]
pub struct SdcaModel<F: Float> {
    /// One row per class; the last entry of each row is the bias.
    weights: Vec<Vec<F>>,
    dimensions: usize,
    epochs_run: usize,
    converged: bool,
    duality_gap: F,
}

impl<F> SdcaClassifier<F>
where
    F: Float + FromPrimitive + AsPrimitive<f64> + Debug + std::iter::Sum,
{
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new(l2_regularization: F, loss: LossConfig<F>, convergence_tolerance: F, max_epochs: usize) -> Self {
        if l2_regularization <= F::zero() {
            panic!("L2 regularization must be strictly positive.");
        }
        if convergence_tolerance <= F::zero() {
            panic!("Convergence tolerance must be strictly positive.");
        }
        if max_epochs == 0 {
            panic!("max_epochs must be greater than 0.");
        }
        if let LossConfig::SmoothedHinge { smoothing } = &loss {
            if *smoothing < F::zero() {
                panic!("Hinge smoothing must not be negative.");
            }
        }

        SdcaClassifier {
            l2_regularization,
            loss,
            convergence_tolerance,
            max_epochs,
            shuffle: true,
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Fits the classifier. Labels are dense class codes; the model gets one
    /// scorer per code in `0..=max_label`.
    ///
    /// Fails when `training_data` is empty, holds a single distinct label, or
    /// mixes feature dimensions.
    pub fn fit(&self, training_data: &[DataPoint<F, usize>]) -> Result<SdcaModel<F>> {
        let Some(first) = training_data.first() else {
            return Err(PipelineError::Training("training set is empty".into()));
        };
        let dimensions = first.dimensions();
        if dimensions == 0 {
            return Err(PipelineError::Training("training samples have no features".into()));
        }
        if let Some((index, dp)) = training_data
            .iter()
            .enumerate()
            .find(|(_, dp)| dp.dimensions() != dimensions)
        {
            return Err(PipelineError::Training(format!(
                "sample {index} has {} features, expected {dimensions}",
                dp.dimensions()
            )));
        }
        let distinct: HashSet<usize> = training_data.iter().map(|dp| dp.label).collect();
        if distinct.len() < 2 {
            return Err(PipelineError::Training(format!(
                "need at least two distinct labels, found {}",
                distinct.len()
            )));
        }

        let n_samples = training_data.len();
        let n_classes = distinct.iter().copied().max().map_or(0, |max| max + 1);
        let n_f = F::from_usize(n_samples)
            .ok_or_else(|| PipelineError::Training("sample count does not fit the float type".into()))?;
        let lambda_n = self.l2_regularization * n_f;

        // Features with the constant bias term appended.
        let samples: Vec<Vec<F>> = training_data
            .iter()
            .map(|dp| {
                let mut x = dp.features.clone();
                x.push(F::one());
                x
            })
            .collect();
        let invariants: Vec<F> = samples
            .iter()
            .map(|x| dot_product_generic(x, x) / lambda_n)
            .collect();
        let signed_labels = |i: usize, class: usize| {
            if training_data[i].label == class { F::one() } else { -F::one() }
        };

        let mut weights = vec![vec![F::zero(); dimensions + 1]; n_classes];
        let mut duals = vec![vec![F::zero(); n_classes]; n_samples];
        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);

        info!(
            "training SDCA on {n_samples} samples, {dimensions} features, {n_classes} classes (lambda={:?}, loss={:?})",
            self.l2_regularization, self.loss
        );

        let mut epochs_run = 0;
        let mut converged = false;
        let mut duality_gap = F::infinity();
        while epochs_run < self.max_epochs {
            epochs_run += 1;
            if self.shuffle {
                order.shuffle(&mut rng);
            }

            for &i in &order {
                let x = &samples[i];
                for class in 0..n_classes {
                    let label = signed_labels(i, class);
                    let output = dot_product_generic(&weights[class], x);
                    let delta = self.loss.dual_update(output, label, duals[i][class], invariants[i]);
                    if delta == F::zero() {
                        continue;
                    }
                    duals[i][class] = duals[i][class] + delta;
                    let step = delta / lambda_n;
                    for (w, &xj) in weights[class].iter_mut().zip(x.iter()) {
                        *w = *w + step * xj;
                    }
                }
            }

            let (primal, dual) = self.objectives(&weights, &samples, &duals, &signed_labels, n_f);
            duality_gap = primal - dual;
            trace!("epoch {epochs_run}: primal={primal:?} dual={dual:?}");
            if duality_gap <= self.convergence_tolerance * primal.max(F::epsilon()) {
                converged = true;
                break;
            }
        }

        if converged {
            debug!("SDCA converged after {epochs_run} epochs (gap={duality_gap:?})");
        } else {
            warn!(
                "SDCA stopped after {epochs_run} epochs without reaching tolerance (gap={duality_gap:?})"
            );
        }

        Ok(SdcaModel {
            weights,
            dimensions,
            epochs_run,
            converged,
            duality_gap,
        })
    }

    /// Primal and dual objectives summed over all one-vs-rest problems.
    fn objectives(
        &self,
        weights: &[Vec<F>],
        samples: &[Vec<F>],
        duals: &[Vec<F>],
        signed_labels: &impl Fn(usize, usize) -> F,
        n_f: F,
    ) -> (F, F) {
        let half = F::from_f64(0.5).unwrap_or_else(F::one);
        let mut primal = F::zero();
        let mut dual = F::zero();
        for (class, w) in weights.iter().enumerate() {
            let regularizer = half * self.l2_regularization * dot_product_generic(w, w);
            let mut loss_sum = F::zero();
            let mut dual_sum = F::zero();
            for (i, x) in samples.iter().enumerate() {
                let label = signed_labels(i, class);
                loss_sum = loss_sum + self.loss.loss(dot_product_generic(w, x), label);
                dual_sum = dual_sum + self.loss.dual_objective(duals[i][class], label);
            }
            primal = primal + loss_sum / n_f + regularizer;
            dual = dual + dual_sum / n_f - regularizer;
        }
        (primal, dual)
    }
}

impl<F> SdcaModel<F>
where
    F: Float + AsPrimitive<f64> + Debug + std::iter::Sum,
{
    pub fn n_classes(&self) -> usize {
        self.weights.len()
    }

    /// Number of input features, not counting the bias.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn duality_gap(&self) -> F {
        self.duality_gap
    }

    /// Raw linear score of every class.
    pub fn scores(&self, features: &[F]) -> Result<Vec<F>> {
        if features.len() != self.dimensions {
            return Err(PipelineError::InvalidInput(format!(
                "expected {} features, got {}",
                self.dimensions,
                features.len()
            )));
        }
        Ok(self
            .weights
            .iter()
            .map(|w| {
                let (bias, coefficients) = w.split_last().map_or((F::zero(), &w[..]), |(b, c)| (*b, c));
                dot_product_generic(coefficients, features) + bias
            })
            .collect())
    }

    /// Class probabilities (softmax over the scores), indexed by class code.
    pub fn predict_proba(&self, features: &[F]) -> Result<Vec<F>> {
        Ok(softmax(&self.scores(features)?))
    }

    /// Most likely class code.
    pub fn predict_code(&self, features: &[F]) -> Result<usize> {
        let scores: Vec<f64> = self.scores(features)?.iter().map(|&s| s.as_()).collect();
        ranking::argmax(&scores).ok_or_else(|| PipelineError::InvalidInput("model has no classes".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_classifier() -> SdcaClassifier<f64> {
        SdcaClassifier::new(1e-3, LossConfig::Log, 1e-4, 500)
    }

    /// Three well separated blobs in two dimensions.
    fn blobs() -> Vec<DataPoint<f64, usize>> {
        let centres = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        let offsets = [(-0.05, -0.05), (0.05, 0.0), (0.0, 0.05), (-0.02, 0.03)];
        let mut data = Vec::new();
        for (label, (cx, cy)) in centres.iter().enumerate() {
            for (dx, dy) in offsets {
                data.push(DataPoint::new(vec![cx + dx, cy + dy], label));
            }
        }
        data
    }

    #[test]
    fn test_sdca_new_valid_parameters() {
        let classifier = default_classifier();
        assert_eq!(classifier.l2_regularization, 1e-3);
        assert_eq!(classifier.loss, LossConfig::Log);
        assert_eq!(classifier.max_epochs, 500);
        assert!(classifier.shuffle);
        assert_eq!(classifier.seed, SdcaClassifier::<f64>::DEFAULT_SEED);
    }

    #[test]
    #[should_panic(expected = "L2 regularization must be strictly positive.")]
    fn test_sdca_new_invalid_l2() {
        SdcaClassifier::<f64>::new(0.0, LossConfig::Log, 1e-3, 10);
    }

    #[test]
    #[should_panic(expected = "Convergence tolerance must be strictly positive.")]
    fn test_sdca_new_invalid_tolerance() {
        SdcaClassifier::<f64>::new(1e-3, LossConfig::Log, -1.0, 10);
    }

    #[test]
    #[should_panic(expected = "max_epochs must be greater than 0.")]
    fn test_sdca_new_invalid_max_epochs() {
        SdcaClassifier::<f64>::new(1e-3, LossConfig::Log, 1e-3, 0);
    }

    #[test]
    #[should_panic(expected = "Hinge smoothing must not be negative.")]
    fn test_sdca_new_invalid_smoothing() {
        SdcaClassifier::<f64>::new(1e-3, LossConfig::SmoothedHinge { smoothing: -1.0 }, 1e-3, 10);
    }

    #[test]
    fn test_fit_empty_is_training_error() {
        let err = default_classifier().fit(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::Training(_)));
    }

    #[test]
    fn test_fit_single_class_is_training_error() {
        let data: Vec<_> = (0..5).map(|i| DataPoint::new(vec![i as f64], 2usize)).collect();
        let err = default_classifier().fit(&data).unwrap_err();
        assert!(err.to_string().contains("two distinct labels"));
    }

    #[test]
    fn test_fit_mixed_dimensions_is_training_error() {
        let data = vec![DataPoint::new(vec![1.0, 2.0], 0usize), DataPoint::new(vec![1.0], 1usize)];
        assert!(matches!(default_classifier().fit(&data), Err(PipelineError::Training(_))));
    }

    #[test]
    fn test_fit_separates_blobs() {
        let data = blobs();
        let model = default_classifier().fit(&data).unwrap();
        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.dimensions(), 2);
        for dp in &data {
            assert_eq!(model.predict_code(&dp.features).unwrap(), dp.label, "{dp:?}");
        }
        assert!(model.duality_gap() >= -1e-9);
    }

    #[test]
    fn test_fit_smoothed_hinge_separates_blobs() {
        let classifier = SdcaClassifier::new(1e-3, LossConfig::SmoothedHinge { smoothing: 1.0 }, 1e-4, 500);
        let data = blobs();
        let model = classifier.fit(&data).unwrap();
        for dp in &data {
            assert_eq!(model.predict_code(&dp.features).unwrap(), dp.label);
        }
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let data = blobs();
        let a = default_classifier().with_seed(7).fit(&data).unwrap();
        let b = default_classifier().with_seed(7).fit(&data).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.predict_proba(&[0.4, 0.4]).unwrap(), b.predict_proba(&[0.4, 0.4]).unwrap());
    }

    #[test]
    fn test_fit_without_shuffle() {
        let model = default_classifier().with_shuffle(false).fit(&blobs()).unwrap();
        assert_eq!(model.predict_code(&[1.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let model = default_classifier().fit(&blobs()).unwrap();
        let proba = model.predict_proba(&[0.3, 0.6]).unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_scores_reject_wrong_dimension() {
        let model = default_classifier().fit(&blobs()).unwrap();
        assert!(matches!(model.scores(&[1.0]), Err(PipelineError::InvalidInput(_))));
    }

    #[test]
    fn test_softmax_handles_large_scores() {
        let p = softmax(&[1000.0_f64, 1000.0]);
        assert!((p[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_f32_training() {
        let data: Vec<DataPoint<f32, usize>> = blobs()
            .into_iter()
            .map(|dp| DataPoint::new(dp.features.iter().map(|&v| v as f32).collect(), dp.label))
            .collect();
        let model = SdcaClassifier::<f32>::new(1e-3, LossConfig::Log, 1e-3, 300).fit(&data).unwrap();
        assert_eq!(model.predict_code(&[0.0, 1.0]).unwrap(), 2);
    }
}
