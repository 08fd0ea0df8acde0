//! Errors raised by crypto engine implementations.
//!
//! I/O errors are wrapped in `Arc` to keep the enum small and cloneable.

use std::sync::Arc;

use thiserror::Error;

/// Failures of a crypto engine call.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The engine executable could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that was launched.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Waiting for the engine or collecting its output failed.
    #[error("failed to collect output of {operation}: {source}")]
    Io {
        /// Engine operation in progress.
        operation: &'static str,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The engine reported failure for an operation that must succeed.
    #[error("{operation} failed: {message}")]
    Failed {
        /// Engine operation that failed.
        operation: &'static str,
        /// Diagnostic text captured from the engine.
        message: String,
    },

    /// The engine produced output that could not be interpreted.
    #[error("{operation} produced invalid output: {message}")]
    InvalidOutput {
        /// Engine operation whose output was rejected.
        operation: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// A signature given as text contained non-ASCII characters.
    #[error("signature text is not ASCII armored: found {found:?} at offset {offset}")]
    NonAsciiSignature {
        /// First offending character.
        found: char,
        /// Character offset of the offending character.
        offset: usize,
    },

    /// The scoped temporary signature file could not be prepared.
    #[error("failed to prepare temporary signature file: {source}")]
    TempFile {
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl EngineError {
    pub(crate) fn spawn(program: &str, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.to_owned(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            source: Arc::new(source),
        }
    }

    pub(crate) fn failed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_output(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn temp_file(source: std::io::Error) -> Self {
        Self::TempFile {
            source: Arc::new(source),
        }
    }
}
