//! Conversion of engine results into response payloads.
//!
//! Every [`OperationResult`] variant has its own function returning a
//! [`Marshalled`] verdict. A negative cryptographic outcome is a
//! [`Marshalled::Failure`], which the host reports as `error: <action>`.

use serde_json::{Value, json};

use crate::dispatch::DispatchError;
use crate::engine::{
    CryptOutcome, KeyListing, OperationResult, Payload, SignOutcome, VerifyOutcome, Version,
};
use crate::whitelist::Action;

/// Outcome of marshalling one engine result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marshalled {
    /// Payload for a success response.
    Success(Value),
    /// The call completed but its outcome was negative.
    Failure,
}

/// Marshals `result` produced for `action`.
///
/// # Errors
///
/// Returns [`DispatchError::UndecodableOutput`] when an armored signature is
/// not valid UTF-8. Decrypted and encrypted data is decoded one character per
/// byte and cannot fail.
pub fn marshal(action: Action, result: OperationResult) -> Result<Marshalled, DispatchError> {
    match result {
        OperationResult::KeyListing(listing) => Ok(key_listing(&listing)),
        OperationResult::Crypt(outcome) => Ok(crypt(outcome)),
        OperationResult::Sign(outcome) => sign(action, outcome),
        OperationResult::Verify(outcome) => Ok(verify(&outcome)),
        OperationResult::PlainText(text) => Ok(plain_text(text)),
        OperationResult::Version(version) => Ok(version_components(&version)),
    }
}

fn key_listing(listing: &KeyListing) -> Marshalled {
    Marshalled::Success(json!(listing.keys()))
}

fn crypt(outcome: CryptOutcome) -> Marshalled {
    if !outcome.ok {
        return Marshalled::Failure;
    }
    let data = Payload::from(outcome.data).into_data_text();
    let sig_info = if outcome.signature.is_empty() {
        Value::Null
    } else {
        json!(outcome.signature)
    };
    Marshalled::Success(json!({
        "data": data,
        "ok": outcome.ok,
        "valid": outcome.valid,
        "sigInfo": sig_info,
    }))
}

fn sign(action: Action, outcome: SignOutcome) -> Result<Marshalled, DispatchError> {
    if !outcome.ok || outcome.data.is_empty() {
        return Ok(Marshalled::Failure);
    }
    Ok(Marshalled::Success(Value::String(decode(
        action,
        outcome.data,
    )?)))
}

fn verify(outcome: &VerifyOutcome) -> Marshalled {
    if !outcome.valid {
        return Marshalled::Failure;
    }
    Marshalled::Success(json!({
        "keyid": outcome.signature.keyid,
        "keyStatus": outcome.signature.key_status,
    }))
}

fn plain_text(text: String) -> Marshalled {
    if text.is_empty() {
        Marshalled::Failure
    } else {
        Marshalled::Success(Value::String(text))
    }
}

fn version_components(version: &Version) -> Marshalled {
    Marshalled::Success(json!(version.components()))
}

fn decode(action: Action, bytes: Vec<u8>) -> Result<String, DispatchError> {
    String::from_utf8(bytes).map_err(|_| DispatchError::UndecodableOutput { action })
}
