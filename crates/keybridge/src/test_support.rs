//! Test doubles shared by unit and behaviour tests.

use std::path::Path;

use keybridge_protocol::Request;
use mockall::mock;

use crate::audit::{AuditError, AuditSink};
use crate::engine::{
    CryptOutcome, CryptoEngine, EncryptOptions, EngineError, ExportOptions, KeyListing,
    ListKeysOptions, SignOptions, SignOutcome, VerifyOutcome, Version,
};

mock! {
    pub Engine {}

    impl CryptoEngine for Engine {
        fn version(&self) -> Result<Version, EngineError>;
        fn list_keys(&self, secret: bool, options: &ListKeysOptions) -> Result<KeyListing, EngineError>;
        fn sign(&self, message: &[u8], options: &SignOptions) -> Result<SignOutcome, EngineError>;
        fn verify_detached_file(&self, signature: &Path, data: &[u8]) -> Result<VerifyOutcome, EngineError>;
        fn encrypt(&self, data: &[u8], recipients: &[String], options: &EncryptOptions) -> Result<CryptOutcome, EngineError>;
        fn decrypt(&self, message: &[u8]) -> Result<CryptOutcome, EngineError>;
        fn export_keys(&self, keyids: &[String], options: &ExportOptions) -> Result<String, EngineError>;
    }
}

mock! {
    pub Audit {}

    impl AuditSink for Audit {
        fn record(&mut self, request: &Request) -> Result<(), AuditError>;
    }
}

/// Frames `request` the way a browser would.
pub(crate) fn request_frame(request: &serde_json::Value) -> Vec<u8> {
    raw_frame(&serde_json::to_vec(request).expect("serialise request"))
}

/// Prefixes arbitrary payload bytes with their native-order length.
#[expect(
    clippy::host_endian_bytes,
    reason = "native messaging prefixes use host byte order"
)]
pub(crate) fn raw_frame(payload: &[u8]) -> Vec<u8> {
    let length = u32::try_from(payload.len()).expect("payload fits a frame");
    let mut frame = length.to_ne_bytes().to_vec();
    frame.extend_from_slice(payload);
    frame
}

/// Decodes the single response frame written to `output`.
#[expect(
    clippy::host_endian_bytes,
    reason = "native messaging prefixes use host byte order"
)]
pub(crate) fn response_from(output: &[u8]) -> keybridge_protocol::Response {
    let (prefix, payload) = output.split_at(keybridge_protocol::PREFIX_LEN);
    let prefix: [u8; 4] = prefix.try_into().expect("prefix bytes");
    let length = usize::try_from(u32::from_ne_bytes(prefix)).expect("length fits usize");
    assert_eq!(payload.len(), length, "exactly one frame must be written");
    serde_json::from_slice(payload).expect("response JSON")
}
