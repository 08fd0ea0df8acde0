//! Typed results returned by crypto engine calls.

use serde::Serialize;

/// Engine version as a sequence of numeric components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Version(Vec<u32>);

impl Version {
    /// Builds a version from its components.
    #[must_use]
    pub const fn new(components: Vec<u32>) -> Self {
        Self(components)
    }

    /// Returns the numeric components, most significant first.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.0
    }
}

/// A signature attached to a user id in a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeySignature {
    /// Issuer key id.
    pub keyid: String,
    /// Issuer user id, when known locally.
    pub uid: String,
    /// Signature class, for example `13x`.
    pub class: String,
}

/// A subkey belonging to a listed key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubkeyRecord {
    /// Subkey id.
    pub keyid: String,
    /// Key length in bits.
    pub length: String,
    /// Public key algorithm number.
    pub algo: String,
    /// Creation timestamp.
    pub date: String,
    /// Expiry timestamp, empty when the subkey does not expire.
    pub expires: String,
    /// Capability letters.
    pub cap: String,
    /// Subkey fingerprint.
    pub fingerprint: String,
}

/// A primary key as reported by a key listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyRecord {
    /// Record type: `pub` for public keys and `sec` for secret keys.
    #[serde(rename = "type")]
    pub kind: String,
    /// Calculated validity.
    pub trust: String,
    /// Key length in bits.
    pub length: String,
    /// Public key algorithm number.
    pub algo: String,
    /// Long key id.
    pub keyid: String,
    /// Creation timestamp.
    pub date: String,
    /// Expiry timestamp, empty when the key does not expire.
    pub expires: String,
    /// Owner trust assigned by the keyring owner.
    pub ownertrust: String,
    /// Capability letters.
    pub cap: String,
    /// Primary key fingerprint.
    pub fingerprint: String,
    /// User ids in listing order.
    pub uids: Vec<String>,
    /// Signatures over the user ids, only present when requested.
    pub sigs: Vec<KeySignature>,
    /// Subkeys in listing order.
    pub subkeys: Vec<SubkeyRecord>,
}

/// Keys returned by a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyListing {
    keys: Vec<KeyRecord>,
}

impl KeyListing {
    /// Wraps listed keys.
    #[must_use]
    pub const fn new(keys: Vec<KeyRecord>) -> Self {
        Self { keys }
    }

    /// Returns the listed keys.
    #[must_use]
    pub fn keys(&self) -> &[KeyRecord] {
        &self.keys
    }

    /// Returns `true` when no key matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Details of a signature observed while verifying or decrypting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    /// Long key id of the signer.
    pub keyid: Option<String>,
    /// Fingerprint of the signing key.
    pub fingerprint: Option<String>,
    /// Primary user id of the signer.
    pub username: Option<String>,
    /// Signature creation timestamp.
    pub timestamp: Option<String>,
    /// Human readable signing key condition, such as an expired key.
    pub key_status: Option<String>,
}

impl SignatureInfo {
    /// Returns `true` when no signature detail was observed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keyid.is_none()
            && self.fingerprint.is_none()
            && self.username.is_none()
            && self.timestamp.is_none()
            && self.key_status.is_none()
    }
}

/// Result of verifying a detached signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Whether a valid signature was found.
    pub valid: bool,
    /// Last status summary reported by the engine.
    pub status: Option<String>,
    /// Signature details.
    pub signature: SignatureInfo,
}

/// Result of creating a signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOutcome {
    /// Whether the engine reported a created signature.
    pub ok: bool,
    /// Signature or signed message bytes.
    pub data: Vec<u8>,
}

/// Result of an encryption or decryption.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CryptOutcome {
    /// Whether the operation completed.
    pub ok: bool,
    /// Last status summary reported by the engine.
    pub status: Option<String>,
    /// Output bytes.
    pub data: Vec<u8>,
    /// Whether an embedded signature verified.
    pub valid: bool,
    /// Details of an embedded signature, if any.
    pub signature: SignatureInfo,
}

/// The closed set of engine results the host knows how to marshal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Output of a key listing.
    KeyListing(KeyListing),
    /// Output of encryption or decryption.
    Crypt(CryptOutcome),
    /// Output of signing.
    Sign(SignOutcome),
    /// Output of signature verification.
    Verify(VerifyOutcome),
    /// Plain text output, such as exported key material.
    PlainText(String),
    /// Engine version.
    Version(Version),
}
