use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Default log filter expression used by the host binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// File name of the audit log, relative to the working directory.
pub const DEFAULT_AUDIT_LOG: &str = "request.log";

/// Engine executable looked up on `PATH` when none is configured.
pub const DEFAULT_GPG_PROGRAM: &str = "gpg";

/// Upper bound for an announced request frame length (64 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: u32 = 64 * 1024 * 1024;

/// Default log filter expression used by the host binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    String::from(DEFAULT_LOG_FILTER)
}

/// Default logging format for the host binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default location of the audit log.
#[must_use]
pub fn default_audit_log() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_AUDIT_LOG)
}

/// Owned engine program name.
#[must_use]
pub fn default_gpg_program() -> String {
    String::from(DEFAULT_GPG_PROGRAM)
}

/// Default request frame ceiling.
#[must_use]
pub const fn default_max_frame_bytes() -> u32 {
    DEFAULT_MAX_FRAME_BYTES
}
