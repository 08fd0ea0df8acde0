//! Schemas for named (keyword) arguments.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{MismatchReason, SchemaMismatch};
use crate::matcher::{Pointer, check_value};
use crate::schema::{Literal, Schema};

/// Schemas for the keyword arguments an action accepts.
///
/// Unlike [`Schema::Mapping`], omitting a declared keyword is allowed: the
/// callee applies its own default, or the pinned literal for keywords whose
/// schema is a [`Schema::Literal`]. Supplying an undeclared keyword is always
/// a mismatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSchema {
    entries: BTreeMap<String, Schema>,
}

impl KeywordSchema {
    /// A schema accepting no keywords at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Builds a keyword schema from name/schema pairs.
    #[must_use]
    pub fn new<K>(entries: impl IntoIterator<Item = (K, Schema)>) -> Self
    where
        K: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, schema)| (name.into(), schema))
                .collect(),
        }
    }

    /// Keywords whose schema pins a literal value.
    pub fn pinned(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.entries
            .iter()
            .filter_map(|(name, schema)| schema.as_literal().map(|literal| (name.as_str(), literal)))
    }

    /// Checks supplied keyword arguments.
    ///
    /// # Errors
    ///
    /// Returns [`MismatchReason::UnexpectedKey`] for an undeclared keyword, or
    /// the first mismatch inside a supplied value.
    pub fn check(&self, kwargs: &Map<String, Value>) -> Result<(), SchemaMismatch> {
        for (name, value) in kwargs {
            let Some(schema) = self.entries.get(name) else {
                return Err(SchemaMismatch::new(
                    String::new(),
                    MismatchReason::UnexpectedKey { key: name.clone() },
                ));
            };
            let mut pointer = Pointer::root();
            pointer.push_key(name);
            check_value(schema, value, &mut pointer)?;
        }
        Ok(())
    }
}
