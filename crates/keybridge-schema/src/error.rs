//! Structured mismatch reports.

use serde_json::Value;
use thiserror::Error;

use crate::kind::ValueKind;

/// Why an instance failed to match its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    /// A literal schema saw a different value.
    #[error("expected literal {expected}, found {found}")]
    Literal {
        /// The pinned value.
        expected: Value,
        /// Kind of the value that was supplied.
        found: ValueKind,
    },
    /// The instance was of the wrong type.
    #[error("expected {expected}, found {found}")]
    Type {
        /// The kind the schema requires.
        expected: ValueKind,
        /// The kind that was supplied.
        found: ValueKind,
    },
    /// A sequence had the wrong number of elements.
    #[error("expected {expected} elements, found {found}")]
    Length {
        /// Elements the schema declares.
        expected: usize,
        /// Elements the instance holds.
        found: usize,
    },
    /// A mapping lacked a key the schema requires.
    #[error("missing key '{key}'")]
    MissingKey {
        /// The absent key.
        key: String,
    },
    /// A mapping held a key the schema does not declare.
    #[error("unexpected key '{key}'")]
    UnexpectedKey {
        /// The undeclared key.
        key: String,
    },
}

/// A mismatch located by the JSON Pointer of the offending instance value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at '{pointer}'")]
pub struct SchemaMismatch {
    pointer: String,
    reason: MismatchReason,
}

impl SchemaMismatch {
    pub(crate) const fn new(pointer: String, reason: MismatchReason) -> Self {
        Self { pointer, reason }
    }

    /// JSON Pointer (RFC 6901) of the value that failed to match. The empty
    /// string denotes the instance root.
    #[must_use]
    pub const fn pointer(&self) -> &str {
        self.pointer.as_str()
    }

    /// Reason for the mismatch.
    #[must_use]
    pub const fn reason(&self) -> &MismatchReason {
        &self.reason
    }

    /// Re-roots the pointer beneath `prefix`, which must itself be a JSON
    /// Pointer such as `/args`.
    #[must_use]
    pub fn within(mut self, prefix: &str) -> Self {
        self.pointer.insert_str(0, prefix);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn reason_is_reported_once() {
        let mismatch = SchemaMismatch::new(
            String::from("/0"),
            MismatchReason::UnexpectedKey {
                key: String::from("passphrase"),
            },
        )
        .within("/args");

        assert_eq!(mismatch.to_string(), "unexpected key 'passphrase' at '/args/0'");
        assert!(mismatch.source().is_none());
    }
}
