//! Declarative argument schemas and a recursive matcher.
//!
//! A [`Schema`] describes which JSON instances are acceptable:
//!
//! - [`Schema::Literal`] accepts exactly one primitive value;
//! - [`Schema::Type`] accepts any value of a [`TypeMarker`]'s type;
//! - [`Schema::Sequence`] matches an equal-length array element-wise;
//! - [`Schema::Mapping`] matches an object with exactly the same key set.
//!
//! Matching is pure and all-or-nothing. [`Schema::check`] reports the first
//! mismatch together with the JSON Pointer of the offending instance value;
//! [`Schema::matches`] collapses that to a boolean.
//!
//! ```
//! use keybridge_schema::{Schema, TypeMarker};
//! use serde_json::json;
//!
//! let schema = Schema::sequence([Schema::Type(TypeMarker::String), Schema::literal(true)]);
//! assert!(schema.matches(&json!(["message", true])));
//! assert!(!schema.matches(&json!(["message", false])));
//! ```

mod error;
mod keywords;
mod kind;
mod matcher;
mod schema;

pub use self::error::{MismatchReason, SchemaMismatch};
pub use self::keywords::KeywordSchema;
pub use self::kind::ValueKind;
pub use self::schema::{Literal, Schema, TypeMarker};
