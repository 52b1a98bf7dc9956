//! Response payload returned by custom code methods

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Field mapping carried by a response. Keys are kept in order and an absent
/// value serializes as `null` rather than being dropped.
pub type Fields = BTreeMap<String, Option<String>>;

/// Status code plus field mapping handed back to the gateway.
///
/// The gateway serializes `fields` as a JSON object and sends it with
/// `status` to the original caller.
///
/// # Example
/// ```
/// use custom_code_sdk::{Fields, Response};
///
/// let mut fields = Fields::new();
/// fields.insert("param1".to_string(), Some("foo".to_string()));
/// let response = Response::ok(fields);
/// assert_eq!(response.status, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response fields
    #[serde(default)]
    pub fields: Fields,
}

impl Response {
    /// Create a response with the given status code and fields.
    pub fn new(status: u16, fields: Fields) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            fields,
        }
    }

    /// Create a 200 OK response.
    pub fn ok(fields: Fields) -> Self {
        Self::new(200, fields)
    }

    /// Create an error response carrying a single `error` field.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        let mut fields = Fields::new();
        fields.insert("error".to_string(), Some(message.into()));
        Self::new(status, fields)
    }

    /// Add a header to the response (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Look up a field. The outer `Option` tells whether the key exists,
    /// the inner one whether its value is present.
    pub fn field(&self, key: &str) -> Option<Option<&str>> {
        self.fields.get(key).map(|v| v.as_deref())
    }

    /// Serialize the fields as the JSON body sent to the caller.
    pub fn body_json(&self) -> Result<String, HandlerError> {
        Ok(serde_json::to_string(&self.fields)?)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok(Fields::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_json_keeps_absent_values() {
        let mut fields = Fields::new();
        fields.insert("param2".to_string(), Some("bar".to_string()));
        fields.insert("param1".to_string(), None);

        let body = Response::ok(fields).body_json().unwrap();
        assert_eq!(body, r#"{"param1":null,"param2":"bar"}"#);
    }

    #[test]
    fn test_field_lookup() {
        let mut fields = Fields::new();
        fields.insert("a".to_string(), None);
        fields.insert("b".to_string(), Some("x".to_string()));
        let response = Response::ok(fields);

        assert_eq!(response.field("a"), Some(None));
        assert_eq!(response.field("b"), Some(Some("x")));
        assert_eq!(response.field("c"), None);
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(404, "missing").with_header("X-Reason", "lookup");

        assert_eq!(response.status, 404);
        assert_eq!(response.field("error"), Some(Some("missing")));
        assert_eq!(response.headers.get("X-Reason").map(String::as_str), Some("lookup"));
    }
}
