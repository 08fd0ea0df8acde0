//! One request, one response: the host pipeline.
//!
//! [`Host::handle`] reads a frame, validates it against the whitelist,
//! records it, dispatches it to the engine, marshals the result and writes a
//! single response frame. Rejected requests are neither recorded nor
//! dispatched.

mod error;

use std::io::{Read, Write};
use std::path::PathBuf;

use keybridge_protocol::{Response, read_frame, write_frame};
use tracing::{debug, info, warn};

pub use self::error::{EXIT_FAILURE, EXIT_IO_FAILURE, HostError};
use crate::audit::AuditSink;
use crate::dispatch::Dispatcher;
use crate::engine::CryptoEngine;
use crate::marshal::{Marshalled, marshal};
use crate::whitelist::Whitelist;

const PIPELINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pipeline");

/// How a run ended when no host error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Input was empty; nothing was written.
    Idle,
    /// A success response was written.
    Succeeded,
    /// The call completed with a negative outcome; an error response was
    /// written.
    LogicalFailure,
    /// The request was refused by the whitelist.
    Rejected,
    /// Dispatch failed; an error response was written.
    DispatchFailed,
}

impl Completion {
    /// Process exit status for this completion.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Idle | Self::Succeeded | Self::LogicalFailure => 0,
            Self::Rejected | Self::DispatchFailed => EXIT_FAILURE,
        }
    }
}

/// Runs the request pipeline against an engine and an audit sink.
pub struct Host<'e, E: ?Sized, A> {
    whitelist: Whitelist,
    engine: &'e E,
    audit: A,
    temp_dir: Option<PathBuf>,
    max_frame_bytes: u32,
}

impl<'e, E, A> Host<'e, E, A>
where
    E: CryptoEngine + ?Sized,
    A: AuditSink,
{
    /// Creates a host using the standard whitelist.
    #[must_use]
    pub fn new(engine: &'e E, audit: A, max_frame_bytes: u32) -> Self {
        Self {
            whitelist: Whitelist::standard(),
            engine,
            audit,
            temp_dir: None,
            max_frame_bytes,
        }
    }

    /// Sets the directory for temporary signature files.
    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: Option<PathBuf>) -> Self {
        self.temp_dir = temp_dir;
        self
    }

    /// Handles at most one request from `input`, answering on `output`.
    ///
    /// # Errors
    ///
    /// Returns a [`HostError`] when the request cannot be read, recorded or
    /// answered. An error frame is attempted first wherever output is still
    /// possible.
    pub fn handle(
        &mut self,
        input: &mut impl Read,
        output: &mut impl Write,
    ) -> Result<Completion, HostError> {
        let request = match read_frame(input, self.max_frame_bytes) {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!(target: PIPELINE_TARGET, "no request pending");
                return Ok(Completion::Idle);
            }
            Err(error) => {
                warn!(target: PIPELINE_TARGET, %error, "unreadable request");
                respond_best_effort(output, &Response::error(error.to_string()));
                return Err(HostError::Framing(error));
            }
        };

        let validated = match self.whitelist.validate(&request) {
            Ok(validated) => validated,
            Err(rejection) => {
                warn!(target: PIPELINE_TARGET, action = request.action(), %rejection, "request rejected");
                send(output, &Response::error(rejection.to_string()))?;
                return Ok(Completion::Rejected);
            }
        };
        let action = validated.action();

        if let Err(error) = self.audit.record(&request) {
            warn!(target: PIPELINE_TARGET, action = action.as_str(), %error, "audit failed");
            respond_best_effort(output, &Response::error(error.to_string()));
            return Err(HostError::Audit(error));
        }

        let dispatcher = Dispatcher::new(self.engine, self.temp_dir.as_deref());
        let outcome = dispatcher
            .dispatch(&validated)
            .and_then(|result| marshal(action, result));

        let (response, completion) = match outcome {
            Ok(Marshalled::Success(data)) => (Response::success(data), Completion::Succeeded),
            Ok(Marshalled::Failure) => (
                Response::error(format!("error: {action}")),
                Completion::LogicalFailure,
            ),
            Err(error) => (
                Response::error(error.to_string()),
                Completion::DispatchFailed,
            ),
        };
        send(output, &response)?;
        info!(
            target: PIPELINE_TARGET,
            action = action.as_str(),
            completion = ?completion,
            "request handled"
        );
        Ok(completion)
    }
}

fn send(output: &mut impl Write, response: &Response) -> Result<(), HostError> {
    write_frame(output, response).map_err(HostError::Output)
}

fn respond_best_effort(output: &mut impl Write, response: &Response) {
    if let Err(error) = write_frame(output, response) {
        warn!(target: PIPELINE_TARGET, %error, "failed to write error response");
    }
}

/// Maps the result of [`Host::handle`] to a process exit status.
#[must_use]
pub const fn exit_code(result: &Result<Completion, HostError>) -> u8 {
    match result {
        Ok(completion) => completion.exit_code(),
        Err(error) => error.exit_code(),
    }
}
