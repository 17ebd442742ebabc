//! errors.rs - Custom error types for the nbscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// This enum represents all possible error types in the `nbscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrubError {
    #[error("Input is not well-formed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected document shape: {0}")]
    Shape(String),

    #[error("Failed to serialize the cleaned document: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScrubError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        ScrubError::Shape(msg.into())
    }
}
