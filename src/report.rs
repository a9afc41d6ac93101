//! JSON error reports.
//!
//! [`format`] turns a [`RequestError`] into a list of JSON values suitable for
//! an HTTP error body. The shape of the report is:
//!
//! ```json
//! [
//!   {"message": "invalid query parameters", "errors": {"page": "invalid type"}},
//!   {"message": "invalid json parameters", "errors": [
//!     {"path": "root|person", "keys": {"email": "invalid email address"}},
//!     {"path": "root|tags", "list_items": {"1": "invalid length, min length = 1"}}
//!   ]}
//! ]
//! ```
//!
//! Header and post-validation failures are reported as a single message
//! string.

use serde_json::{json, Map, Value};

use crate::error::{ItemError, PathError, PathErrorKind, RuleErrors};
use crate::request::{ParamSource, RequestError};

/// Builds a JSON report for a rejected request.
///
/// # Example
///
/// ```rust
/// use reqguard::{report, Param, ParamSource, ParamType, RawRequest, RequestValidator};
/// use serde_json::json;
///
/// let validator = RequestValidator::new().param(Param::new("page", ParamSource::Query, ParamType::Int));
/// let error = validator.validate(&RawRequest::new().query("page", "x")).unwrap_err();
///
/// assert_eq!(
///     report::format(&error),
///     vec![json!({"message": "invalid query parameters", "errors": {"page": "invalid type"}})]
/// );
/// ```
pub fn format(error: &RequestError) -> Vec<Value> {
    let invalid = match error {
        RequestError::InvalidHeaders(_) | RequestError::AfterParam(_) => {
            return vec![Value::String(error.to_string())];
        }
        RequestError::InvalidRequest(invalid) => invalid,
    };

    let mut report = Vec::new();
    for source in [ParamSource::Query, ParamSource::Form, ParamSource::Path, ParamSource::Json] {
        if let Some(fields) = invalid.fields(source).filter(|f| !f.is_empty()) {
            report.push(entry(source, Value::Object(field_messages(fields))));
        }
    }
    if !invalid.json.nested.is_empty() {
        let paths = invalid.json.nested.iter().map(path_error).collect();
        report.push(entry(ParamSource::Json, Value::Array(paths)));
    }
    report
}

fn entry(source: ParamSource, errors: Value) -> Value {
    json!({
        "message": format!("invalid {} parameters", source),
        "errors": errors,
    })
}

fn field_messages<'a>(fields: impl IntoIterator<Item = (&'a String, &'a RuleErrors)>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, errors)| (name.clone(), Value::String(errors.to_string())))
        .collect()
}

/// Renders one path error.
pub fn path_error(error: &PathError) -> Value {
    let mut out = Map::new();
    out.insert("path".to_string(), Value::String(error.depth.to_string()));
    match &error.kind {
        PathErrorKind::ShapeMismatch { expected } => {
            out.insert("message".to_string(), Value::String(format!("expected {}", expected)));
        }
        PathErrorKind::Object(fields) => {
            out.insert("keys".to_string(), Value::Object(field_messages(fields)));
        }
        PathErrorKind::Array(items) => {
            let items: Map<String, Value> = items
                .iter()
                .map(|(index, item)| (index.to_string(), item_error(item)))
                .collect();
            out.insert("list_items".to_string(), Value::Object(items));
        }
    }
    Value::Object(out)
}

fn item_error(error: &ItemError) -> Value {
    match error {
        ItemError::Fields(fields) => Value::Object(field_messages(fields)),
        other => Value::String(other.to_string()),
    }
}
