//! Recursive instance matching.
//!
//! Matching stops at the first mismatch. Sequence length is checked before
//! any element, and mapping key sets are compared before any value, so the
//! reported reason is independent of element content.

use serde_json::{Map, Value};

use crate::error::{MismatchReason, SchemaMismatch};
use crate::kind::ValueKind;
use crate::schema::Schema;

/// Instance location tracked while descending.
#[derive(Debug, Default)]
pub(crate) struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    pub(crate) fn root() -> Self {
        Self::default()
    }

    fn push_index(&mut self, index: usize) {
        self.tokens.push(index.to_string());
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.tokens.push(key.replace('~', "~0").replace('/', "~1"));
    }

    fn pop(&mut self) {
        drop(self.tokens.pop());
    }

    fn render(&self) -> String {
        self.tokens.iter().fold(String::new(), |mut rendered, token| {
            rendered.push('/');
            rendered.push_str(token);
            rendered
        })
    }

    fn mismatch(&self, reason: MismatchReason) -> SchemaMismatch {
        SchemaMismatch::new(self.render(), reason)
    }
}

impl Schema {
    /// Checks `instance` against this schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaMismatch`] found.
    pub fn check(&self, instance: &Value) -> Result<(), SchemaMismatch> {
        check_value(self, instance, &mut Pointer::root())
    }

    /// Whether `instance` matches this schema.
    #[must_use]
    pub fn matches(&self, instance: &Value) -> bool {
        self.check(instance).is_ok()
    }

    /// Checks a slice of values against positional schemas, as if both were
    /// a [`Schema::Sequence`] and an array.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaMismatch`] found, rooted at the slice.
    pub fn check_sequence(schemas: &[Self], instances: &[Value]) -> Result<(), SchemaMismatch> {
        check_elements(schemas, instances, &mut Pointer::root())
    }
}

pub(crate) fn check_value(
    schema: &Schema,
    instance: &Value,
    pointer: &mut Pointer,
) -> Result<(), SchemaMismatch> {
    match schema {
        Schema::Literal(literal) => {
            if literal.is_equal_to(instance) {
                Ok(())
            } else {
                Err(pointer.mismatch(MismatchReason::Literal {
                    expected: literal.to_value(),
                    found: ValueKind::of(instance),
                }))
            }
        }
        Schema::Type(marker) => {
            if marker.accepts(instance) {
                Ok(())
            } else {
                Err(pointer.mismatch(MismatchReason::Type {
                    expected: marker.kind(),
                    found: ValueKind::of(instance),
                }))
            }
        }
        Schema::Sequence(elements) => match instance {
            Value::Array(items) => check_elements(elements, items, pointer),
            other => Err(pointer.mismatch(MismatchReason::Type {
                expected: ValueKind::List,
                found: ValueKind::of(other),
            })),
        },
        Schema::Mapping(entries) => match instance {
            Value::Object(members) => check_entries(entries, members, pointer),
            other => Err(pointer.mismatch(MismatchReason::Type {
                expected: ValueKind::Mapping,
                found: ValueKind::of(other),
            })),
        },
    }
}

fn check_elements(
    schemas: &[Schema],
    items: &[Value],
    pointer: &mut Pointer,
) -> Result<(), SchemaMismatch> {
    if schemas.len() != items.len() {
        return Err(pointer.mismatch(MismatchReason::Length {
            expected: schemas.len(),
            found: items.len(),
        }));
    }

    for (index, (schema, item)) in schemas.iter().zip(items).enumerate() {
        pointer.push_index(index);
        check_value(schema, item, pointer)?;
        pointer.pop();
    }
    Ok(())
}

fn check_entries(
    entries: &std::collections::BTreeMap<String, Schema>,
    members: &Map<String, Value>,
    pointer: &mut Pointer,
) -> Result<(), SchemaMismatch> {
    if let Some(key) = members.keys().find(|key| !entries.contains_key(key.as_str())) {
        return Err(pointer.mismatch(MismatchReason::UnexpectedKey { key: key.clone() }));
    }
    if let Some(key) = entries.keys().find(|key| !members.contains_key(key.as_str())) {
        return Err(pointer.mismatch(MismatchReason::MissingKey { key: key.clone() }));
    }

    for (key, schema) in entries {
        if let Some(member) = members.get(key) {
            pointer.push_key(key);
            check_value(schema, member, pointer)?;
            pointer.pop();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
