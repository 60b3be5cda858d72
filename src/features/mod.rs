pub mod assembler;
pub mod normalizer;

pub use assembler::{FEATURE_NAMES, FeatureVector, assemble};
pub use normalizer::{Normalization, Normalizer};
