//! Crypto engine facade.
//!
//! The host never talks to OpenPGP tooling directly. Every operation goes
//! through [`CryptoEngine`], which keeps the pipeline testable with an
//! in-memory engine and lets [`GpgEngine`] own the process plumbing.

mod error;
mod gpg;
mod results;
mod stream;

use std::path::Path;

pub use self::error::EngineError;
pub use self::gpg::GpgEngine;
pub use self::results::{
    CryptOutcome, KeyListing, KeyRecord, KeySignature, OperationResult, SignOutcome,
    SignatureInfo, SubkeyRecord, VerifyOutcome, Version,
};
pub use self::stream::{Payload, StreamVerify};

/// Options accepted by key listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListKeysOptions {
    /// Include signatures over user ids.
    pub sigs: bool,
    /// Restrict the listing to these key specifiers.
    pub keys: Vec<String>,
}

/// Options accepted by signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOptions {
    /// Signing key, or the engine default when absent.
    pub keyid: Option<String>,
    /// Produce a cleartext signature.
    pub clearsign: bool,
    /// Produce a detached signature.
    pub detach: bool,
    /// Produce binary rather than ASCII armored output.
    pub binary: bool,
}

impl Default for SignOptions {
    fn default() -> Self {
        Self {
            keyid: None,
            clearsign: true,
            detach: false,
            binary: false,
        }
    }
}

/// Options accepted by encryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptOptions {
    /// Produce ASCII armored output.
    pub armor: bool,
}

impl Default for EncryptOptions {
    fn default() -> Self {
        Self { armor: true }
    }
}

/// Options accepted by key export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Strip all signatures except the latest self-signatures.
    pub minimal: bool,
    /// Produce ASCII armored output.
    pub armor: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            minimal: false,
            armor: true,
        }
    }
}

/// Operations the host may delegate to an OpenPGP implementation.
///
/// Logical failures, such as a bad signature or an unknown recipient, are
/// reported inside the returned outcome. `Err` is reserved for failures to
/// run the operation at all.
pub trait CryptoEngine {
    /// Reports the engine version.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run or its version cannot
    /// be parsed.
    fn version(&self) -> Result<Version, EngineError>;

    /// Lists public keys, or secret keys when `secret` is set.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run.
    fn list_keys(&self, secret: bool, options: &ListKeysOptions)
    -> Result<KeyListing, EngineError>;

    /// Signs `message`.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run.
    fn sign(&self, message: &[u8], options: &SignOptions) -> Result<SignOutcome, EngineError>;

    /// Verifies `data` against the detached signature stored at `signature`.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run.
    fn verify_detached_file(
        &self,
        signature: &Path,
        data: &[u8],
    ) -> Result<VerifyOutcome, EngineError>;

    /// Encrypts `data` for `recipients`.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run.
    fn encrypt(
        &self,
        data: &[u8],
        recipients: &[String],
        options: &EncryptOptions,
    ) -> Result<CryptOutcome, EngineError>;

    /// Decrypts `message`.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run.
    fn decrypt(&self, message: &[u8]) -> Result<CryptOutcome, EngineError>;

    /// Exports the public keys named by `keyids`.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot be run or produces output
    /// that is not text.
    fn export_keys(
        &self,
        keyids: &[String],
        options: &ExportOptions,
    ) -> Result<String, EngineError>;
}
