//! Top-level failures of one host run.

use keybridge_protocol::FramingError;
use thiserror::Error;

use crate::audit::AuditError;

/// Exit status for protocol, rejection and dispatch failures.
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for local I/O failures.
pub const EXIT_IO_FAILURE: u8 = 2;

/// Failures that prevent a normal response from being delivered.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    /// The request frame was truncated, oversized or not a request.
    #[error("failed to read request: {0}")]
    Framing(#[source] FramingError),
    /// The response frame could not be written.
    #[error("failed to write response: {0}")]
    Output(#[source] FramingError),
    /// The accepted request could not be recorded.
    #[error("failed to record request: {0}")]
    Audit(#[source] AuditError),
}

impl HostError {
    /// Process exit status for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Framing(_) => EXIT_FAILURE,
            Self::Output(_) | Self::Audit(_) => EXIT_IO_FAILURE,
        }
    }
}
