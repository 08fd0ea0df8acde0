//! Shared configuration for the keybridge native messaging host.
//!
//! Configuration is layered with `ortho_config`: built-in defaults, an
//! optional configuration file (`--config-path` or `KEYBRIDGE_CONFIG_PATH`),
//! `KEYBRIDGE_*` environment variables, and finally command-line flags. The
//! browser launches the host with its own positional arguments, so callers
//! filter the raw argument list through [`split_config_arguments`] before
//! handing it to [`Config::load_from_iter`].

mod arguments;
mod defaults;
mod logging;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use arguments::{CONFIG_CLI_FLAGS, ConfigArgumentSplit, split_config_arguments};
pub use defaults::{
    DEFAULT_AUDIT_LOG, DEFAULT_GPG_PROGRAM, DEFAULT_LOG_FILTER, DEFAULT_MAX_FRAME_BYTES,
    default_audit_log, default_gpg_program, default_log_filter, default_log_filter_string,
    default_log_format, default_max_frame_bytes,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "KEYBRIDGE")]
pub struct Config {
    /// Tracing filter expression applied to stderr logging.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log lines.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Append-only file receiving every accepted request.
    #[ortho_config(default = default_audit_log())]
    pub audit_log: Utf8PathBuf,
    /// Directory for scoped temporary files; the system temp dir when unset.
    pub temp_dir: Option<Utf8PathBuf>,
    /// OpenPGP engine executable.
    #[ortho_config(default = default_gpg_program())]
    pub gpg_program: String,
    /// Keyring home passed to the engine as `--homedir`.
    pub gnupg_home: Option<Utf8PathBuf>,
    /// Largest request frame the host will read, in bytes.
    #[ortho_config(default = default_max_frame_bytes())]
    pub max_frame_bytes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            audit_log: default_audit_log(),
            temp_dir: None,
            gpg_program: default_gpg_program(),
            gnupg_home: None,
            max_frame_bytes: default_max_frame_bytes(),
        }
    }
}

impl Config {
    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log line format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Audit log location.
    #[must_use]
    pub fn audit_log(&self) -> &Utf8Path {
        self.audit_log.as_path()
    }

    /// Scoped temporary file directory, if overridden.
    #[must_use]
    pub fn temp_dir(&self) -> Option<&Utf8Path> {
        self.temp_dir.as_deref()
    }

    /// Engine executable name or path.
    #[must_use]
    pub fn gpg_program(&self) -> &str {
        self.gpg_program.as_str()
    }

    /// Keyring home directory, if overridden.
    #[must_use]
    pub fn gnupg_home(&self) -> Option<&Utf8Path> {
        self.gnupg_home.as_deref()
    }

    /// Request frame ceiling in bytes.
    #[must_use]
    pub const fn max_frame_bytes(&self) -> u32 {
        self.max_frame_bytes
    }
}
