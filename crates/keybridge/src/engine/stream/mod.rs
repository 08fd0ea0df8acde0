//! Verification of in-memory signatures against in-memory data.
//!
//! Engines verify detached signatures stored in files. [`StreamVerify`]
//! bridges the gap by writing the signature to a scoped temporary file that
//! is removed once the engine returns, whatever the outcome.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

use super::{CryptoEngine, EngineError, VerifyOutcome};

const ENGINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Signature or data supplied to stream verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Text that must be converted to bytes before use.
    Text(String),
    /// Bytes used as given.
    Bytes(Vec<u8>),
}

impl Payload {
    /// Converts the payload into signature bytes.
    ///
    /// Armored signatures are ASCII, so text containing anything else is
    /// rejected rather than guessed at.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonAsciiSignature`] for non-ASCII text.
    pub fn into_signature_bytes(self) -> Result<Vec<u8>, EngineError> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => {
                if let Some((offset, found)) =
                    text.chars().enumerate().find(|(_, ch)| !ch.is_ascii())
                {
                    return Err(EngineError::NonAsciiSignature { found, offset });
                }
                Ok(text.into_bytes())
            }
        }
    }

    /// Converts the payload into data bytes.
    ///
    /// Characters up to U+00FF become the byte of the same value. Anything
    /// above is written as a `\uXXXX` or `\UXXXXXXXX` escape sequence.
    #[must_use]
    pub fn into_data_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => escape_text(&text),
        }
    }

    /// Converts the payload into text, mapping each byte to the character of
    /// the same value.
    ///
    /// Reverses [`Payload::into_data_bytes`] for text without code points
    /// above U+00FF, so data sent to the engine and data returned by it share
    /// one encoding.
    #[must_use]
    pub fn into_data_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Bytes(bytes) => bytes.into_iter().map(char::from).collect(),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

fn escape_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match u8::try_from(u32::from(ch)) {
            Ok(byte) => bytes.push(byte),
            Err(_) if u32::from(ch) <= 0xFFFF => {
                bytes.extend_from_slice(format!("\\u{:04x}", u32::from(ch)).as_bytes());
            }
            Err(_) => {
                bytes.extend_from_slice(format!("\\U{:08x}", u32::from(ch)).as_bytes());
            }
        }
    }
    bytes
}

/// Detached verification of a signature held in memory.
///
/// Implemented for every [`CryptoEngine`].
pub trait StreamVerify: CryptoEngine {
    /// Verifies `data` against `signature` using a temporary signature file
    /// created in `temp_dir`, or the system temporary directory when absent.
    ///
    /// The temporary file never outlives this call.
    ///
    /// # Errors
    ///
    /// Returns an error when the signature text is not ASCII, when the
    /// temporary file cannot be written, or when the engine fails.
    fn verify_streams(
        &self,
        signature: Payload,
        data: Payload,
        temp_dir: Option<&Path>,
    ) -> Result<VerifyOutcome, EngineError> {
        let signature_bytes = signature.into_signature_bytes()?;
        let data_bytes = data.into_data_bytes();

        let mut file = temp_dir
            .map_or_else(NamedTempFile::new, NamedTempFile::new_in)
            .map_err(EngineError::temp_file)?;
        file.write_all(&signature_bytes)
            .and_then(|()| file.flush())
            .map_err(EngineError::temp_file)?;

        let outcome = self.verify_detached_file(file.path(), &data_bytes);
        if let Err(error) = file.close() {
            warn!(
                target: ENGINE_TARGET,
                %error,
                "failed to remove temporary signature file"
            );
        }
        outcome
    }
}

impl<E: CryptoEngine + ?Sized> StreamVerify for E {}
