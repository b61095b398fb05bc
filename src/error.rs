//! Error handling for newsdesk
//!
//! This module defines the crate-level error type and a Result alias used by
//! configuration loading and pipeline assembly. Errors raised inside the
//! running pipeline live in [`crate::pipeline::PipelineError`] and convert
//! into [`NewsdeskError`] via `From`.

use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for newsdesk operations
#[derive(Error, Debug)]
pub enum NewsdeskError {
    /// Semantically invalid configuration (bad capacity, missing field)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Syntax error in a text configuration descriptor
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Errors raised while assembling or running the pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NewsdeskError>,
    },
}

impl NewsdeskError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NewsdeskError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        NewsdeskError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for newsdesk operations
pub type Result<T> = std::result::Result<T, NewsdeskError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<NewsdeskError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let e: NewsdeskError = e.into();
            e.with_context(context)
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let e: NewsdeskError = e.into();
            e.with_context(f())
        })
    }
}
