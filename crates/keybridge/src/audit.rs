//! Append-only record of accepted requests.
//!
//! Only requests that passed validation are recorded. Responses are never
//! written to the audit log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use keybridge_protocol::Request;
use thiserror::Error;
use tracing::debug;

const AUDIT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::audit");

/// Failures while appending to the audit log.
#[derive(Debug, Clone, Error)]
pub enum AuditError {
    /// The log file could not be opened for appending.
    #[error("failed to open audit log '{path}': {source}")]
    Open {
        /// Log file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// The request could not be rendered as JSON text.
    #[error("failed to serialise audit record: {0}")]
    Serialize(#[source] Arc<serde_json::Error>),
    /// The record could not be written.
    #[error("failed to append to audit log '{path}': {source}")]
    Write {
        /// Log file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

/// Destination for audit records.
pub trait AuditSink {
    /// Appends one validated request.
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`] when the record cannot be persisted.
    fn record(&mut self, request: &Request) -> Result<(), AuditError>;
}

/// Appends requests to a file as compact JSON, one per line.
///
/// The file is opened for each record and closed afterwards. Records from
/// concurrent host processes may interleave.
#[derive(Debug, Clone)]
pub struct FileAuditSink {
    path: PathBuf,
}

impl FileAuditSink {
    /// Creates a sink appending to `path`, which is created on first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AuditSink for FileAuditSink {
    fn record(&mut self, request: &Request) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(request)
            .map_err(|error| AuditError::Serialize(Arc::new(error)))?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| AuditError::Open {
                path: self.path.clone(),
                source: Arc::new(source),
            })?;
        file.write_all(line.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| AuditError::Write {
                path: self.path.clone(),
                source: Arc::new(source),
            })?;
        debug!(target: AUDIT_TARGET, path = %self.path.display(), "request recorded");
        Ok(())
    }
}
