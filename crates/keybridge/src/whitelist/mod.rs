//! The embedded registry of actions a caller may request.
//!
//! [`Whitelist::standard`] is the only source of what the dispatcher can
//! ever execute. Validation produces a [`ValidatedRequest`], which can only
//! be obtained from [`Whitelist::validate`], so dispatch is unreachable for
//! requests that have not passed the gate.

use std::collections::HashMap;

use keybridge_protocol::Request;
use keybridge_schema::{KeywordSchema, Schema, SchemaMismatch, TypeMarker};
use serde_json::{Map, Value};
use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Actions the host can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    /// Report the engine version.
    GetVersion,
    /// List public or secret keys.
    ListKeys,
    /// Produce a detached signature.
    Sign,
    /// Verify an in-memory signature against in-memory data.
    VerifySignatureAgainstData,
    /// Encrypt for a recipient.
    Encrypt,
    /// Decrypt a message.
    Decrypt,
    /// Export public key material.
    ExportKeys,
}

impl Action {
    /// Every action in registry order.
    pub const ALL: [Self; 7] = [
        Self::GetVersion,
        Self::ListKeys,
        Self::Sign,
        Self::VerifySignatureAgainstData,
        Self::Encrypt,
        Self::Decrypt,
        Self::ExportKeys,
    ];

    /// Returns the wire name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Argument schemas permitted for one action.
#[derive(Debug, Clone, PartialEq)]
pub struct WhitelistEntry {
    args: Vec<Schema>,
    kwargs: KeywordSchema,
}

impl WhitelistEntry {
    /// Creates an entry from positional and keyword schemas.
    #[must_use]
    pub fn new(args: impl IntoIterator<Item = Schema>, kwargs: KeywordSchema) -> Self {
        Self {
            args: args.into_iter().collect(),
            kwargs,
        }
    }

    /// Positional argument schemas in order.
    #[must_use]
    pub fn args(&self) -> &[Schema] {
        &self.args
    }

    /// Keyword argument schemas.
    #[must_use]
    pub const fn kwargs(&self) -> &KeywordSchema {
        &self.kwargs
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    /// The action is not registered.
    #[error("forbidden action {action}: not whitelisted")]
    UnknownAction {
        /// Action name as received.
        action: String,
    },
    /// Arguments did not satisfy the action's schemas.
    #[error("forbidden action {action}: {mismatch}")]
    Arguments {
        /// Action whose schemas were violated.
        action: Action,
        /// First mismatch, with a pointer into the request.
        mismatch: SchemaMismatch,
    },
}

/// A request that satisfied its whitelist entry.
///
/// Keyword arguments include pinned literal values for keywords the caller
/// omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    action: Action,
    args: Vec<Value>,
    kwargs: Map<String, Value>,
}

impl ValidatedRequest {
    /// The validated action.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// Positional arguments as received.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Keyword arguments with pinned literals applied.
    #[must_use]
    pub const fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }
}

/// Fixed mapping from action to its permitted argument schemas.
#[derive(Debug, Clone)]
pub struct Whitelist {
    entries: HashMap<Action, WhitelistEntry>,
}

impl Whitelist {
    /// The registry of supported actions.
    ///
    /// `exportKeys` never accepts a secret-key flag, so private key material
    /// cannot leave through this channel. `sign` is pinned to detached
    /// armored signatures.
    #[must_use]
    pub fn standard() -> Self {
        let string = || Schema::from(TypeMarker::String);
        let boolean = || Schema::from(TypeMarker::Boolean);
        let entries = HashMap::from([
            (
                Action::GetVersion,
                WhitelistEntry::new([], KeywordSchema::empty()),
            ),
            (
                Action::ListKeys,
                WhitelistEntry::new(
                    [boolean()],
                    KeywordSchema::new([("sigs", boolean()), ("keys", TypeMarker::List.into())]),
                ),
            ),
            (
                Action::Sign,
                WhitelistEntry::new(
                    [string()],
                    KeywordSchema::new([
                        ("keyid", string()),
                        ("clearsign", Schema::literal(false)),
                        ("binary", Schema::literal(false)),
                        ("detach", Schema::literal(true)),
                    ]),
                ),
            ),
            (
                Action::VerifySignatureAgainstData,
                WhitelistEntry::new([string(), string()], KeywordSchema::empty()),
            ),
            (
                Action::Encrypt,
                WhitelistEntry::new(
                    [string(), string()],
                    KeywordSchema::new([("armor", Schema::literal(true))]),
                ),
            ),
            (
                Action::Decrypt,
                WhitelistEntry::new([string()], KeywordSchema::empty()),
            ),
            (
                Action::ExportKeys,
                WhitelistEntry::new(
                    [string()],
                    KeywordSchema::new([
                        ("minimal", boolean()),
                        ("armor", Schema::literal(true)),
                    ]),
                ),
            ),
        ]);
        Self { entries }
    }

    /// Looks up the entry for `action`.
    #[must_use]
    pub fn entry(&self, action: Action) -> Option<&WhitelistEntry> {
        self.entries.get(&action)
    }

    /// Checks `request` against its action's entry.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] when the action is not registered or any
    /// argument fails its schema. Nothing is partially accepted.
    pub fn validate(&self, request: &Request) -> Result<ValidatedRequest, Rejection> {
        let unknown = || Rejection::UnknownAction {
            action: request.action().to_owned(),
        };
        let action: Action = request.action().parse().map_err(|_| unknown())?;
        let entry = self.entry(action).ok_or_else(unknown)?;

        let reject = |mismatch: SchemaMismatch| Rejection::Arguments { action, mismatch };
        Schema::check_sequence(entry.args(), request.args())
            .map_err(|mismatch| reject(mismatch.within("/args")))?;
        entry
            .kwargs()
            .check(request.kwargs())
            .map_err(|mismatch| reject(mismatch.within("/kwargs")))?;

        let mut kwargs = request.kwargs().clone();
        for (name, literal) in entry.kwargs().pinned() {
            kwargs
                .entry(name.to_owned())
                .or_insert_with(|| literal.to_value());
        }
        Ok(ValidatedRequest {
            action,
            args: request.args().to_vec(),
            kwargs,
        })
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests;
