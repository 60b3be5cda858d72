//! Data structures shared between the feature stages and the trainer.

/// A single training example: a feature vector and its encoded label.
///
/// - `F`: The type of the features (e.g., `f32`, `f64`).
/// - `L`: The type of the label. The trainer works with `usize` label codes
///   produced by [`crate::encoding::LabelMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint<F, L> {
    pub features: Vec<F>,
    pub label: L,
}

impl<F, L> DataPoint<F, L> {
    pub fn new(features: Vec<F>, label: L) -> Self {
        DataPoint { features, label }
    }

    /// Number of features in this example.
    pub fn dimensions(&self) -> usize {
        self.features.len()
    }
}
