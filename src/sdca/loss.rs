//! Loss functions and their dual coordinate updates.

use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

// --- Numerically stable helpers ---

/// `1 / (1 + e^-z)` without overflowing for large `|z|`.
pub fn sigmoid<F: Float>(z: F) -> F {
    if z >= F::zero() {
        F::one() / (F::one() + (-z).exp())
    } else {
        let e = z.exp();
        e / (F::one() + e)
    }
}

/// `ln(1 + e^-margin)`.
fn log_one_plus_exp_neg<F: Float>(margin: F) -> F {
    if margin > F::zero() {
        (-margin).exp().ln_1p()
    } else {
        -margin + margin.exp().ln_1p()
    }
}

/// `-(a ln a + (1 - a) ln(1 - a))` with `0 ln 0 = 0`.
fn binary_entropy<F: Float>(a: F) -> F {
    let term = |p: F| if p > F::zero() { p * p.ln() } else { F::zero() };
    -(term(a) + term(F::one() - a))
}

fn clamp_unit<F: Float>(value: F) -> F {
    value.max(F::zero()).min(F::one())
}

/// Loss minimised by the trainer. Labels passed to every method are `+1` or `-1`.
#[derive(Debug, Clone, PartialEq)]
pub enum LossConfig<F: Float> {
    /// Logistic loss: `ln(1 + exp(-y * s))`.
    Log,
    /// Hinge loss with a quadratic band of width `smoothing` around the margin.
    SmoothedHinge { smoothing: F },
}

impl<F> LossConfig<F>
where
    F: Float + FromPrimitive + Debug,
{
    /// Primal loss of a score `output` for a sample labelled `label`.
    pub fn loss(&self, output: F, label: F) -> F {
        let margin = label * output;
        match self {
            LossConfig::Log => log_one_plus_exp_neg(margin),
            LossConfig::SmoothedHinge { smoothing } => {
                let truncated = F::one() - margin;
                if truncated <= F::zero() {
                    F::zero()
                } else if truncated < *smoothing {
                    truncated * truncated / (*smoothing + *smoothing)
                } else {
                    truncated - *smoothing / (F::one() + F::one())
                }
            }
        }
    }

    /// Contribution of one dual variable to the dual objective, i.e. the
    /// negated convex conjugate `-φ*(-α)`.
    pub fn dual_objective(&self, dual: F, label: F) -> F {
        let a = clamp_unit(dual * label);
        match self {
            LossConfig::Log => binary_entropy(a),
            LossConfig::SmoothedHinge { smoothing } => a - *smoothing * a * a / (F::one() + F::one()),
        }
    }

    /// Change to apply to `dual` given the current score of the sample.
    ///
    /// `invariant` is `||x||^2 / (lambda * n)`. The updated dual always stays
    /// in `label * [0, 1]`.
    pub fn dual_update(&self, output: F, label: F, dual: F, invariant: F) -> F {
        let a_old = dual * label;
        let a_new = match self {
            LossConfig::Log => {
                // One Newton step on the coordinate, using 1/4 as the bound on the
                // logistic curvature.
                let quarter = F::from_f64(0.25).unwrap_or_else(F::one);
                let target = sigmoid(-label * output);
                a_old + (target - a_old) / (F::one() + invariant * quarter)
            }
            LossConfig::SmoothedHinge { smoothing } => {
                (F::one() - label * output - *smoothing * a_old) / (invariant + *smoothing) + a_old
            }
        };
        clamp_unit(a_new) * label - dual
    }
}

impl<F: Float> Default for LossConfig<F> {
    fn default() -> Self {
        LossConfig::Log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_sigmoid_is_stable_and_symmetric() {
        assert!((sigmoid(0.0_f64) - 0.5).abs() < EPS);
        assert!((sigmoid(3.0_f64) + sigmoid(-3.0_f64) - 1.0).abs() < EPS);
        assert_eq!(sigmoid(-1000.0_f64), 0.0);
        assert_eq!(sigmoid(1000.0_f64), 1.0);
    }

    #[test]
    fn test_log_loss_values() {
        let loss = LossConfig::<f64>::Log;
        assert!((loss.loss(0.0, 1.0) - 2.0_f64.ln()).abs() < EPS);
        assert!(loss.loss(10.0, 1.0) < loss.loss(10.0, -1.0));
        // Large negative margins stay finite.
        assert!((loss.loss(-800.0, 1.0) - 800.0).abs() < 1e-6);
    }

    #[test]
    fn test_smoothed_hinge_loss_regions() {
        let loss = LossConfig::SmoothedHinge { smoothing: 1.0_f64 };
        assert_eq!(loss.loss(2.0, 1.0), 0.0);
        assert!((loss.loss(0.5, 1.0) - 0.125).abs() < EPS);
        assert!((loss.loss(-1.0, 1.0) - 1.5).abs() < EPS);
    }

    #[test]
    fn test_dual_update_stays_in_box() {
        for loss in [LossConfig::Log, LossConfig::SmoothedHinge { smoothing: 0.5_f64 }] {
            for &label in &[1.0, -1.0] {
                for &output in &[-50.0, -1.0, 0.0, 1.0, 50.0] {
                    for &dual in &[0.0, 0.3 * label, label] {
                        let delta = loss.dual_update(output, label, dual, 2.0);
                        let a = (dual + delta) * label;
                        assert!((-EPS..=1.0 + EPS).contains(&a), "{loss:?} a={a}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_log_dual_update_moves_towards_sigmoid() {
        let loss = LossConfig::<f64>::Log;
        // With zero invariant the step lands exactly on sigmoid(-y * s).
        let delta = loss.dual_update(0.0, 1.0, 0.0, 0.0);
        assert!((delta - 0.5).abs() < EPS);
    }

    #[test]
    fn test_dual_objective_bounds() {
        let loss = LossConfig::<f64>::Log;
        assert_eq!(loss.dual_objective(0.0, 1.0), 0.0);
        assert!((loss.dual_objective(-0.5, -1.0) - 2.0_f64.ln()).abs() < EPS);
    }
}
