//! Access to raw request data.

use std::collections::HashMap;

use serde_json::Value;

use super::source::ParamSource;

/// Read access to the raw parts of an incoming request.
///
/// Framework adapters implement this for their request type. Values are
/// returned as JSON: strings for query, form, path and header parameters.
pub trait RequestData {
    /// Returns the raw value of a named parameter, if present.
    ///
    /// Header names are always asked for in lowercase; implementations
    /// should match them case-insensitively.
    fn value(&self, source: ParamSource, name: &str) -> Option<Value>;

    /// Returns the decoded JSON body, if the request has one.
    fn json_body(&self) -> Option<Value>;
}

/// An in-memory request, built field by field.
///
/// # Example
///
/// ```rust
/// use reqguard::{ParamSource, RawRequest, RequestData};
/// use serde_json::json;
///
/// let request = RawRequest::new()
///     .query("page", "2")
///     .header("X-Token", "abc")
///     .json(json!({"name": "ann"}));
///
/// assert_eq!(request.value(ParamSource::Query, "page"), Some(json!("2")));
/// assert_eq!(request.value(ParamSource::Header, "x-token"), Some(json!("abc")));
/// assert_eq!(request.value(ParamSource::Json, "name"), Some(json!("ann")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    values: HashMap<ParamSource, HashMap<String, Value>>,
    body: Option<Value>,
}

impl RawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, source: ParamSource, name: String, value: Value) -> Self {
        self.values.entry(source).or_default().insert(name, value);
        self
    }

    pub fn query(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(ParamSource::Query, name.into(), value.into())
    }

    pub fn form(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(ParamSource::Form, name.into(), value.into())
    }

    pub fn path(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(ParamSource::Path, name.into(), value.into())
    }

    pub fn header(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(ParamSource::Header, name.into().to_lowercase(), value.into())
    }

    /// Sets the decoded JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl RequestData for RawRequest {
    fn value(&self, source: ParamSource, name: &str) -> Option<Value> {
        match source {
            ParamSource::Json => self.body.as_ref()?.get(name).cloned(),
            ParamSource::Header => self.values.get(&source)?.get(&name.to_lowercase()).cloned(),
            _ => self.values.get(&source)?.get(name).cloned(),
        }
    }

    fn json_body(&self) -> Option<Value> {
        self.body.clone()
    }
}
