//! Request and response envelopes carried inside frames.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FramingError;

/// One request from the parent process.
///
/// `args` and `kwargs` default to empty when omitted; unknown top-level
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    action: String,
    #[serde(default)]
    args: Vec<Value>,
    #[serde(default)]
    kwargs: Map<String, Value>,
}

impl Request {
    /// Creates a request.
    #[must_use]
    pub fn new(action: impl Into<String>, args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        Self {
            action: action.into(),
            args,
            kwargs,
        }
    }

    /// Parses a request from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::Parse`] when the text is not JSON or does not
    /// have the request shape.
    pub fn parse(text: &str) -> Result<Self, FramingError> {
        serde_json::from_str(text).map_err(FramingError::from_json_error)
    }

    /// Name of the requested action.
    #[must_use]
    pub const fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Positional arguments.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Keyword arguments.
    #[must_use]
    pub const fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }
}

/// Response status reported in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The action ran and produced a positive result.
    Success,
    /// The request was rejected, failed, or produced a negative result.
    Error,
}

/// One response to the parent process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "type")]
    status: ResponseStatus,
    data: Value,
}

impl Response {
    /// Creates a success response carrying the marshalled payload.
    #[must_use]
    pub const fn success(data: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }

    /// Creates an error response carrying a description.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: Value::String(message.into()),
        }
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> ResponseStatus {
        self.status
    }

    /// Response payload.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_request() {
        let request =
            Request::parse(r#"{"action":"listKeys","args":[true],"kwargs":{"sigs":false}}"#)
                .expect("request parses");
        assert_eq!(request.action(), "listKeys");
        assert_eq!(request.args(), &[json!(true)]);
        assert_eq!(request.kwargs().get("sigs"), Some(&json!(false)));
    }

    #[test]
    fn args_and_kwargs_default_to_empty() {
        let request = Request::parse(r#"{"action":"getVersion"}"#).expect("request parses");
        assert!(request.args().is_empty());
        assert!(request.kwargs().is_empty());
    }

    #[test]
    fn ignores_unknown_top_level_fields() {
        let request = Request::parse(r#"{"action":"getVersion","id":7}"#).expect("request parses");
        assert_eq!(request.action(), "getVersion");
    }

    #[test]
    fn rejects_missing_action() {
        let error = Request::parse(r#"{"args":[]}"#).expect_err("action is required");
        assert!(matches!(error, FramingError::Parse { .. }));
    }

    #[test]
    fn rejects_non_string_action() {
        assert!(Request::parse(r#"{"action":3}"#).is_err());
    }

    #[test]
    fn rejects_non_object_kwargs() {
        assert!(Request::parse(r#"{"action":"sign","kwargs":[1]}"#).is_err());
    }

    #[test]
    fn response_serialises_type_and_data() {
        let text = serde_json::to_string(&Response::success(json!([2, 2, 19])))
            .expect("response serialises");
        assert_eq!(text, r#"{"type":"success","data":[2,2,19]}"#);

        let text =
            serde_json::to_string(&Response::error("error: sign")).expect("response serialises");
        assert_eq!(text, r#"{"type":"error","data":"error: sign"}"#);
    }
}
