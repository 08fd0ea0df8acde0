//! Errors raised while reading or writing protocol frames.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Failures of the framing layer. None of them are recoverable for the
/// current request.
#[derive(Debug, Clone, Error)]
pub enum FramingError {
    /// The stream ended inside the length prefix or the payload.
    #[error("truncated frame: expected {expected} bytes, received {received}")]
    Truncated {
        /// Bytes the frame announced (or the prefix length).
        expected: usize,
        /// Bytes actually available before end of input.
        received: usize,
    },

    /// The announced or produced frame exceeds the permitted size.
    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Size of the offending frame.
        size: u64,
        /// Configured ceiling.
        limit: u64,
    },

    /// The payload is not a UTF-8 JSON request.
    #[error("invalid request payload: {message}")]
    Parse {
        /// Human-readable parse failure.
        message: String,
        /// Underlying JSON error, when the payload was valid UTF-8.
        #[source]
        source: Option<Arc<serde_json::Error>>,
    },

    /// Reading from the input stream failed.
    #[error("failed to read frame: {0}")]
    Read(#[source] Arc<io::Error>),

    /// Writing to the output stream failed.
    #[error("failed to write frame: {0}")]
    Write(#[source] Arc<io::Error>),

    /// The response could not be serialised.
    #[error("failed to serialise response: {0}")]
    Serialize(#[source] Arc<serde_json::Error>),
}

impl FramingError {
    /// Creates a parse error from a JSON decoding failure.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::Parse {
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a parse error with a custom message.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn read(source: io::Error) -> Self {
        Self::Read(Arc::new(source))
    }

    pub(crate) fn write(source: io::Error) -> Self {
        Self::Write(Arc::new(source))
    }
}
