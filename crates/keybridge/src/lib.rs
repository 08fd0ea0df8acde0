//! OpenPGP native messaging host.
//!
//! A parent process, typically a browser extension, launches the host and
//! sends one length-prefixed JSON request on stdin. The host checks the
//! request against a fixed whitelist of actions and argument schemas,
//! appends accepted requests to an audit log, performs the operation through
//! a [`CryptoEngine`], and writes one length-prefixed JSON response on
//! stdout before exiting.
//!
//! ## Pipeline
//!
//! 1. **Framing**: [`keybridge_protocol::read_frame`] reads the request.
//!    Empty input ends the run quietly.
//! 2. **Validation**: [`Whitelist::validate`] accepts or rejects the whole
//!    request. Rejected requests reach neither the audit log nor the engine.
//! 3. **Audit**: the accepted request is appended to the [`AuditSink`].
//! 4. **Dispatch**: [`Dispatcher`] maps the [`Action`] to one engine call.
//! 5. **Marshalling**: [`marshal`] turns the engine result into a response
//!    payload or a negative verdict.

mod audit;
mod dispatch;
mod engine;
mod host;
mod marshal;
pub mod telemetry;
mod whitelist;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

use std::io::{Read, Write};

use keybridge_config::Config;
use tracing::info;

pub use self::audit::{AuditError, AuditSink, FileAuditSink};
pub use self::dispatch::{DispatchError, Dispatcher};
pub use self::engine::{
    CryptOutcome, CryptoEngine, EncryptOptions, EngineError, ExportOptions, GpgEngine,
    KeyListing, KeyRecord, KeySignature, ListKeysOptions, OperationResult, Payload, SignOptions,
    SignOutcome, SignatureInfo, StreamVerify, SubkeyRecord, VerifyOutcome, Version,
};
pub use self::host::{Completion, EXIT_FAILURE, EXIT_IO_FAILURE, Host, HostError, exit_code};
pub use self::marshal::{Marshalled, marshal};
pub use self::whitelist::{Action, Rejection, ValidatedRequest, Whitelist, WhitelistEntry};

const PIPELINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pipeline");

/// Serves one request with the engine and audit log described by `config`.
///
/// `caller` is the origin the parent process passed on the command line, if
/// any, and is only used for logging. Returns the process exit status.
pub fn run(
    config: &Config,
    caller: Option<&str>,
    input: &mut impl Read,
    output: &mut impl Write,
) -> u8 {
    info!(target: PIPELINE_TARGET, caller = caller.unwrap_or("unknown"), "host started");
    let engine = GpgEngine::from_config(config);
    let audit = FileAuditSink::new(config.audit_log().as_std_path());
    let temp_dir = config.temp_dir().map(|dir| dir.as_std_path().to_path_buf());
    let mut host = Host::new(&engine, audit, config.max_frame_bytes()).with_temp_dir(temp_dir);
    let result = host.handle(input, output);
    let code = exit_code(&result);
    info!(target: PIPELINE_TARGET, exit_code = code, "host finished");
    code
}
