//! Pipeline-specific error types.

use thiserror::Error;

/// Errors that can occur while assembling or running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Buffer '{buffer}' needs a capacity of at least 1")]
    ZeroCapacity { buffer: String },

    #[error("Failed to spawn stage '{stage}': {source}")]
    Spawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stage '{stage}' panicked")]
    StagePanicked { stage: String },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
