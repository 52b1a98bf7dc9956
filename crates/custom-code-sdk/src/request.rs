//! Inbound API call representation for custom code methods

use crate::error::HandlerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Represents one inbound call to a custom code method.
///
/// The gateway builds this from the wire-level HTTP request; a method only
/// sees the parsed parameters and the raw body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Name of the custom code method the call was routed to
    pub method_name: String,

    /// HTTP verb (GET, POST, PUT, DELETE)
    #[serde(default = "default_verb")]
    pub verb: String,

    /// Named parameters (query string)
    #[serde(default)]
    pub params: HashMap<String, String>,

    /// HTTP headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Raw request body, empty when the caller sent none
    #[serde(default)]
    pub body: String,

    /// Request ID for tracing
    #[serde(default)]
    pub request_id: String,
}

fn default_verb() -> String {
    "GET".to_string()
}

impl Request {
    /// Create a GET request for the given method with no parameters and an empty body.
    pub fn new(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            ..Self::default()
        }
    }

    /// Set the HTTP verb (builder pattern).
    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = verb.into();
        self
    }

    /// Add a named parameter (builder pattern).
    ///
    /// # Example
    /// ```
    /// use custom_code_sdk::Request;
    ///
    /// let req = Request::new("hello_world_params").with_param("param1", "foo");
    /// assert_eq!(req.param("param1"), Some("foo"));
    /// ```
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a header (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Look up a named parameter. Returns `None` when the caller did not send it.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter parsed as a specific type.
    /// Returns None if the parameter doesn't exist or can't be parsed.
    pub fn param_as<T: FromStr>(&self, key: &str) -> Option<T> {
        self.params.get(key).and_then(|v| v.parse().ok())
    }

    /// Get a required parameter parsed as a specific type.
    /// Returns HandlerError::BadRequest if missing or invalid.
    ///
    /// # Example
    /// ```ignore
    /// let limit: usize = req.require_param("limit")?;
    /// ```
    pub fn require_param<T: FromStr>(&self, key: &str) -> Result<T, HandlerError> {
        self.params.get(key)
            .ok_or_else(|| HandlerError::BadRequest(format!("Missing required parameter: {}", key)))?
            .parse()
            .map_err(|_| HandlerError::BadRequest(format!("Invalid value for parameter: {}", key)))
    }

    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the caller sent a non-empty body.
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Check if request verb matches (case-insensitive).
    pub fn is_verb(&self, verb: &str) -> bool {
        self.verb.eq_ignore_ascii_case(verb)
    }

    /// Parse the body as JSON into a typed struct.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, HandlerError> {
        serde_json::from_str(&self.body)
            .map_err(|e| HandlerError::BadRequest(format!("Invalid JSON: {}", e)))
    }
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method_name: String::new(),
            verb: default_verb(),
            params: HashMap::new(),
            headers: HashMap::new(),
            body: String::new(),
            request_id: String::new(),
        }
    }
}
