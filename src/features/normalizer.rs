//! Per-feature scaling fitted on the training vectors.

use serde::{Deserialize, Serialize};

use super::assembler::FeatureVector;
use crate::data::FEATURE_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Values are passed through untouched.
    None,
    /// Divide by the largest absolute training value. Zero stays zero.
    #[default]
    MaxAbs,
    /// Map the training range onto `[0, 1]`.
    MinMax,
}

/// Affine map `(x - offset) * scale` per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalizer {
    offset: [f32; FEATURE_COUNT],
    scale: [f32; FEATURE_COUNT],
}

impl Normalizer {
    pub fn identity() -> Self {
        Normalizer {
            offset: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    /// Fits the scaling on `vectors`. A feature with no spread, no data, or a
    /// spread whose reciprocal is not a finite positive number keeps the
    /// identity transform.
    pub fn fit(vectors: &[FeatureVector], mode: Normalization) -> Self {
        let mut normalizer = Self::identity();
        if vectors.is_empty() || mode == Normalization::None {
            return normalizer;
        }

        for feature in 0..FEATURE_COUNT {
            let column = vectors.iter().map(|v| v.as_slice()[feature]);
            match mode {
                Normalization::None => {}
                Normalization::MaxAbs => {
                    let max_abs = column.fold(0.0f32, |acc, x| acc.max(x.abs()));
                    let scale = 1.0 / max_abs;
                    if scale.is_finite() && scale > 0.0 {
                        normalizer.scale[feature] = scale;
                    }
                }
                Normalization::MinMax => {
                    let (min, max) = column.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                        (lo.min(x), hi.max(x))
                    });
                    // `max - min` can overflow to infinity, and a subnormal range
                    // has an infinite reciprocal.
                    let scale = 1.0 / (max - min);
                    if scale.is_finite() && scale > 0.0 {
                        normalizer.offset[feature] = min;
                        normalizer.scale[feature] = scale;
                    }
                }
            }
        }
        normalizer
    }

    pub fn transform(&self, vector: &FeatureVector) -> [f32; FEATURE_COUNT] {
        let mut out = vector.to_array();
        for ((value, offset), scale) in out.iter_mut().zip(&self.offset).zip(&self.scale) {
            *value = (*value - offset) * scale;
        }
        out
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors() -> Vec<FeatureVector> {
        vec![
            FeatureVector::new(2.0, -4.0, 1.0, 0.0).unwrap(),
            FeatureVector::new(4.0, 2.0, 1.0, 0.0).unwrap(),
            FeatureVector::new(3.0, 1.0, 1.0, 0.0).unwrap(),
        ]
    }

    #[test]
    fn test_max_abs_scaling() {
        let normalizer = Normalizer::fit(&vectors(), Normalization::MaxAbs);
        let out = normalizer.transform(&vectors()[0]);
        assert_eq!(out, [0.5, -1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_min_max_scaling() {
        let normalizer = Normalizer::fit(&vectors(), Normalization::MinMax);
        assert_eq!(normalizer.transform(&vectors()[0]), [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(normalizer.transform(&vectors()[1]), [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_subnormal_column_keeps_identity_scale() {
        let tiny = vec![
            FeatureVector::new(1.0, 2.0, 3.0, 1e-40).unwrap(),
            FeatureVector::new(2.0, 2.0, 3.0, 0.0).unwrap(),
        ];
        for mode in [Normalization::MaxAbs, Normalization::MinMax] {
            let out = Normalizer::fit(&tiny, mode).transform(&tiny[0]);
            assert!(out.iter().all(|x| x.is_finite()), "{mode:?}: {out:?}");
            assert_eq!(out[3], 1e-40);
        }
    }

    #[test]
    fn test_overflowing_range_keeps_identity_scale() {
        let wide = vec![
            FeatureVector::new(f32::MAX, 1.0, 1.0, 1.0).unwrap(),
            FeatureVector::new(-f32::MAX, 2.0, 1.0, 1.0).unwrap(),
        ];
        let normalizer = Normalizer::fit(&wide, Normalization::MinMax);
        let out = normalizer.transform(&wide[0]);
        assert_eq!(out[0], f32::MAX);
        assert!(out.iter().all(|x| x.is_finite()), "{out:?}");
    }

    #[test]
    fn test_none_and_empty_are_identity() {
        let v = vectors()[1];
        assert_eq!(Normalizer::fit(&vectors(), Normalization::None).transform(&v), v.to_array());
        assert_eq!(Normalizer::fit(&[], Normalization::MinMax), Normalizer::identity());
    }
}
