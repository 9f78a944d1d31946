//! Explorer Error Types
//!
//! Every fallible core operation reports through [`ExplorerError`]. Parameter
//! validation fails before any buffer is allocated, so an error never leaves
//! partially generated content installed in the scene.

use std::fmt;

/// Errors produced by the galaxy explorer core.
#[derive(Debug)]
pub enum ExplorerError {
    /// A galaxy parameter is non-finite or out of its allowed range.
    InvalidParameters {
        /// Parameter name as it appears in `GalaxyParameters`.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable description of the allowed range.
        reason: &'static str,
    },
    /// The rendering boundary could not be acquired (no surface, adapter or device).
    RendererUnavailable(String),
    /// A frame could not be submitted to the renderer.
    RenderFailed(String),
    /// The configuration file could not be read.
    ConfigIo(std::io::Error),
    /// The configuration file is not valid JSON for `ExplorerConfig`.
    ConfigParse(serde_json::Error),
    /// The configuration parsed but holds unusable values.
    InvalidConfig(String),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorerError::InvalidParameters {
                field,
                value,
                reason,
            } => write!(f, "invalid galaxy parameter '{field}' = {value}: {reason}"),
            ExplorerError::RendererUnavailable(msg) => write!(f, "renderer unavailable: {msg}"),
            ExplorerError::RenderFailed(msg) => write!(f, "render failed: {msg}"),
            ExplorerError::ConfigIo(e) => write!(f, "config IO error: {e}"),
            ExplorerError::ConfigParse(e) => write!(f, "config JSON error: {e}"),
            ExplorerError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ExplorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExplorerError::ConfigIo(e) => Some(e),
            ExplorerError::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExplorerError {
    fn from(e: std::io::Error) -> Self {
        ExplorerError::ConfigIo(e)
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(e: serde_json::Error) -> Self {
        ExplorerError::ConfigParse(e)
    }
}

/// Convenience alias: a `Result` using [`ExplorerError`].
pub type ExplorerResult<T> = Result<T, ExplorerError>;
