//! [`CryptoEngine`] backed by the `gpg` command-line tool.
//!
//! Each call launches one `gpg` process in batch mode with status lines on
//! stderr, feeds the payload on stdin, and interprets the status report.

mod colons;
mod status;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use keybridge_config::Config;
use tracing::debug;

use self::status::StatusReport;
use super::{
    CryptOutcome, CryptoEngine, EncryptOptions, EngineError, ExportOptions, KeyListing,
    ListKeysOptions, SignOptions, SignOutcome, VerifyOutcome, Version,
};

const ENGINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Runs OpenPGP operations through an external `gpg` executable.
#[derive(Debug, Clone)]
pub struct GpgEngine {
    program: String,
    homedir: Option<PathBuf>,
}

impl GpgEngine {
    /// Creates an engine running `program` against the default keyring.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            homedir: None,
        }
    }

    /// Points the engine at a specific GnuPG home directory.
    #[must_use]
    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    /// Builds an engine from the host configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let engine = Self::new(config.gpg_program());
        if let Some(home) = config.gnupg_home() {
            return engine.with_homedir(home.as_std_path());
        }
        engine
    }

    fn base_arguments(&self) -> Vec<OsString> {
        let mut flags = arguments(["--batch", "--no-tty", "--status-fd", "2"]);
        if let Some(home) = &self.homedir {
            flags.push(OsString::from("--homedir"));
            flags.push(home.clone().into_os_string());
        }
        flags
    }

    fn run(
        &self,
        operation: &'static str,
        operation_flags: Vec<OsString>,
        input: Option<&[u8]>,
    ) -> Result<EngineOutput, EngineError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.base_arguments())
            .args(operation_flags)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(target: ENGINE_TARGET, operation, program = %self.program, "launching engine");
        let mut child = command
            .spawn()
            .map_err(|error| EngineError::spawn(&self.program, error))?;

        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            if let (Some(mut pipe), Some(bytes)) = (stdin, input) {
                scope.spawn(move || {
                    if let Err(error) = pipe.write_all(bytes) {
                        debug!(target: ENGINE_TARGET, operation, %error, "engine closed stdin early");
                    }
                });
            }
            child.wait_with_output()
        })
        .map_err(|error| EngineError::io(operation, error))?;

        debug!(
            target: ENGINE_TARGET,
            operation,
            status = %output.status,
            stdout_bytes = output.stdout.len(),
            "engine finished"
        );
        Ok(EngineOutput {
            status: output.status,
            stdout: output.stdout,
            report: StatusReport::parse(&String::from_utf8_lossy(&output.stderr)),
        })
    }
}

struct EngineOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    report: StatusReport,
}

impl EngineOutput {
    fn stdout_text(self, operation: &'static str) -> Result<String, EngineError> {
        String::from_utf8(self.stdout)
            .map_err(|error| EngineError::invalid_output(operation, error.to_string()))
    }
}

fn arguments<const N: usize>(flags: [&str; N]) -> Vec<OsString> {
    flags.into_iter().map(OsString::from).collect()
}

fn list_arguments(secret: bool, options: &ListKeysOptions) -> Vec<OsString> {
    let listing = match (secret, options.sigs) {
        (true, _) => "--list-secret-keys",
        (false, true) => "--list-sigs",
        (false, false) => "--list-keys",
    };
    let mut args = arguments(["--with-colons", "--fixed-list-mode", "--with-fingerprint", listing]);
    args.extend(options.keys.iter().map(OsString::from));
    args
}

fn sign_arguments(options: &SignOptions) -> Vec<OsString> {
    let mode = if options.detach {
        "--detach-sign"
    } else if options.clearsign {
        "--clearsign"
    } else {
        "--sign"
    };
    let mut args = arguments([mode]);
    if !options.binary {
        args.push(OsString::from("--armor"));
    }
    if let Some(keyid) = &options.keyid {
        args.push(OsString::from("--local-user"));
        args.push(OsString::from(keyid));
    }
    args
}

fn verify_arguments(signature: &Path) -> Vec<OsString> {
    vec![
        OsString::from("--verify"),
        signature.as_os_str().to_owned(),
        OsString::from("-"),
    ]
}

fn encrypt_arguments(recipients: &[String], options: &EncryptOptions) -> Vec<OsString> {
    let mut args = arguments(["--encrypt"]);
    if options.armor {
        args.push(OsString::from("--armor"));
    }
    for recipient in recipients {
        args.push(OsString::from("--recipient"));
        args.push(OsString::from(recipient));
    }
    args
}

fn export_arguments(keyids: &[String], options: &ExportOptions) -> Vec<OsString> {
    let mut args = Vec::new();
    if options.armor {
        args.push(OsString::from("--armor"));
    }
    if options.minimal {
        args.extend(arguments(["--export-options", "export-minimal"]));
    }
    args.push(OsString::from("--export"));
    args.extend(keyids.iter().map(OsString::from));
    args
}

/// Parses the first line of `gpg --version`, e.g. `gpg (GnuPG) 2.4.5`.
fn parse_version(stdout: &str) -> Option<Version> {
    let token = stdout.lines().next()?.split_whitespace().last()?;
    let components = token
        .split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok()
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Version::new(components))
}

impl CryptoEngine for GpgEngine {
    fn version(&self) -> Result<Version, EngineError> {
        const OPERATION: &str = "version";
        let output = self.run(OPERATION, arguments(["--version"]), None)?;
        if !output.status.success() {
            return Err(EngineError::failed(OPERATION, output.report.diagnostic_text()));
        }
        let text = output.stdout_text(OPERATION)?;
        parse_version(&text)
            .ok_or_else(|| EngineError::invalid_output(OPERATION, "unrecognised version banner"))
    }

    fn list_keys(
        &self,
        secret: bool,
        options: &ListKeysOptions,
    ) -> Result<KeyListing, EngineError> {
        const OPERATION: &str = "list keys";
        let output = self.run(OPERATION, list_arguments(secret, options), None)?;
        let text = output.stdout_text(OPERATION)?;
        Ok(colons::parse_listing(&text))
    }

    fn sign(&self, message: &[u8], options: &SignOptions) -> Result<SignOutcome, EngineError> {
        let output = self.run("sign", sign_arguments(options), Some(message))?;
        Ok(SignOutcome {
            ok: output.report.signature_created,
            data: output.stdout,
        })
    }

    fn verify_detached_file(
        &self,
        signature: &Path,
        data: &[u8],
    ) -> Result<VerifyOutcome, EngineError> {
        let output = self.run("verify", verify_arguments(signature), Some(data))?;
        let report = output.report;
        Ok(VerifyOutcome {
            valid: report.valid,
            status: report.status,
            signature: report.signature,
        })
    }

    fn encrypt(
        &self,
        data: &[u8],
        recipients: &[String],
        options: &EncryptOptions,
    ) -> Result<CryptOutcome, EngineError> {
        let output = self.run("encrypt", encrypt_arguments(recipients, options), Some(data))?;
        let report = output.report;
        Ok(CryptOutcome {
            ok: report.encryption_ended,
            status: report.status,
            data: output.stdout,
            valid: false,
            signature: report.signature,
        })
    }

    fn decrypt(&self, message: &[u8]) -> Result<CryptOutcome, EngineError> {
        let output = self.run("decrypt", arguments(["--decrypt"]), Some(message))?;
        let report = output.report;
        Ok(CryptOutcome {
            ok: report.decryption_okay && !report.decryption_failed,
            status: report.status,
            data: output.stdout,
            valid: report.valid,
            signature: report.signature,
        })
    }

    fn export_keys(
        &self,
        keyids: &[String],
        options: &ExportOptions,
    ) -> Result<String, EngineError> {
        const OPERATION: &str = "export keys";
        let output = self.run(OPERATION, export_arguments(keyids, options), None)?;
        output.stdout_text(OPERATION)
    }
}
