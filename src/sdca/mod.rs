// Declare sdca.rs as a submodule of the `sdca` module (defined by this mod.rs file)
pub mod loss;
pub mod ranking;
pub mod sdca;

pub use loss::LossConfig;
pub use ranking::{ScoredClass, TopClasses, argmax, top_k};
pub use sdca::{SdcaClassifier, SdcaModel, softmax};
