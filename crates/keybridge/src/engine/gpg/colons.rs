//! Parser for colon-delimited key listings.

use crate::engine::{KeyListing, KeyRecord, KeySignature, SubkeyRecord};

const TYPE: usize = 0;
const VALIDITY: usize = 1;
const LENGTH: usize = 2;
const ALGO: usize = 3;
const KEYID: usize = 4;
const CREATED: usize = 5;
const EXPIRES: usize = 6;
const OWNERTRUST: usize = 8;
const USER_ID: usize = 9;
const SIG_CLASS: usize = 10;
const CAPABILITIES: usize = 11;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FingerprintOwner {
    Primary,
    Subkey,
}

/// Builds a key listing from colon-delimited engine output.
pub(super) fn parse_listing(stdout: &str) -> KeyListing {
    let mut keys: Vec<KeyRecord> = Vec::new();
    let mut owner = FingerprintOwner::Primary;
    for line in stdout.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        let field = |index: usize| fields.get(index).copied().unwrap_or_default().to_owned();
        match fields.get(TYPE).copied().unwrap_or_default() {
            kind @ ("pub" | "sec") => {
                keys.push(KeyRecord {
                    kind: kind.to_owned(),
                    trust: field(VALIDITY),
                    length: field(LENGTH),
                    algo: field(ALGO),
                    keyid: field(KEYID),
                    date: field(CREATED),
                    expires: field(EXPIRES),
                    ownertrust: field(OWNERTRUST),
                    cap: field(CAPABILITIES),
                    ..KeyRecord::default()
                });
                owner = FingerprintOwner::Primary;
            }
            "sub" | "ssb" => {
                if let Some(key) = keys.last_mut() {
                    key.subkeys.push(SubkeyRecord {
                        keyid: field(KEYID),
                        length: field(LENGTH),
                        algo: field(ALGO),
                        date: field(CREATED),
                        expires: field(EXPIRES),
                        cap: field(CAPABILITIES),
                        fingerprint: String::new(),
                    });
                    owner = FingerprintOwner::Subkey;
                }
            }
            "fpr" => {
                let fingerprint = field(USER_ID);
                match (owner, keys.last_mut()) {
                    (FingerprintOwner::Primary, Some(key)) if key.fingerprint.is_empty() => {
                        key.fingerprint = fingerprint;
                    }
                    (FingerprintOwner::Subkey, Some(key)) => {
                        if let Some(subkey) = key.subkeys.last_mut() {
                            subkey.fingerprint = fingerprint;
                        }
                    }
                    _ => {}
                }
            }
            "uid" => {
                if let Some(key) = keys.last_mut() {
                    key.uids.push(unescape(&field(USER_ID)));
                }
            }
            "sig" => {
                if let Some(key) = keys.last_mut() {
                    key.sigs.push(KeySignature {
                        keyid: field(KEYID),
                        uid: unescape(&field(USER_ID)),
                        class: field(SIG_CLASS),
                    });
                }
            }
            _ => {}
        }
    }
    KeyListing::new(keys)
}

/// Decodes `\xHH` escapes used for colons and control characters in user ids.
fn unescape(field: &str) -> String {
    let raw = field.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut rest = raw;
    while let Some((&first, tail)) = rest.split_first() {
        if first == b'\\'
            && let Some(byte) = escaped_byte(tail)
        {
            bytes.push(byte);
            rest = tail.get(3..).unwrap_or_default();
            continue;
        }
        bytes.push(first);
        rest = tail;
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn escaped_byte(tail: &[u8]) -> Option<u8> {
    match tail {
        [b'x', high, low, ..] => {
            let digits = [*high, *low];
            let text = std::str::from_utf8(&digits).ok()?;
            u8::from_str_radix(text, 16).ok()
        }
        _ => None,
    }
}
