//! Error types for rmink library.

use std::io;
use thiserror::Error;

/// Result type alias for rmink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Hard failures that abort a conversion.
///
/// Recoverable conditions (unknown pen types, text overflow, degraded
/// output) are reported as [`crate::render::Diagnostic`]s instead.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The decoded scene violates a structural invariant.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The decoded scene contains no pages.
    #[error("Document has no pages")]
    EmptyDocument,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// An emitter could not produce its output at all.
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a [`Error::MalformedInput`] error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Render(format!("PDF serialization error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Error::Io(err.into())
        } else if err.is_data() || err.is_syntax() || err.is_eof() {
            Error::MalformedInput(err.to_string())
        } else {
            Error::Render(format!("JSON serialization error: {}", err))
        }
    }
}
