//! Error types for the view engine.

use thiserror::Error;

/// Errors that can occur while servicing a render request.
///
/// Per-pixel conditions (a pixel outside the projection domain) are never
/// errors; they are absorbed into the output's no-data mask. Only
/// whole-request failures surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed projection parameters; fatal to the requested render.
    #[error("invalid projection parameters: {0}")]
    InvalidParameters(String),

    /// The source raster is missing or empty; no partial output is produced.
    #[error("source raster unavailable: {0}")]
    SourceUnavailable(String),

    /// Failed to build the worker pool for a sweep.
    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

impl EngineError {
    /// Create an InvalidParameters error.
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }

    /// Create a SourceUnavailable error.
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }
}

impl From<projection::ProjectionError> for EngineError {
    fn from(err: projection::ProjectionError) -> Self {
        Self::InvalidParameters(err.to_string())
    }
}

impl From<sphere_common::ExtentError> for EngineError {
    fn from(err: sphere_common::ExtentError) -> Self {
        Self::SourceUnavailable(err.to_string())
    }
}

/// Result type for view engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
