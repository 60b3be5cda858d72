//! Error type shared by every stage of the pipeline.

use std::io;

use thiserror::Error;

/// The result type used across the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything that can abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The dataset could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A dataset line did not match the schema. `line` is 1-based.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("training failed: {0}")]
    Training(String),

    /// A label code with no entry in the label map.
    #[error("label code {code} is not in the label map ({len} labels)")]
    UnknownLabel { code: usize, len: usize },

    /// A label string with no entry in the label map.
    #[error("label {0:?} is not in the label map")]
    UnseenLabel(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid schema: {0}")]
    Schema(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        PipelineError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
