//! Parameter sources and raw-value types.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number as JsonNumber, Value};

use crate::error::RuleError;
use crate::rules::parse_integer;

/// Where a request parameter is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamSource {
    /// The URL query string.
    Query,
    /// Form fields of the request body.
    Form,
    /// Named segments of the matched route.
    Path,
    /// Request headers. Names are matched case-insensitively.
    Header,
    /// Top-level keys of the JSON body.
    Json,
}

impl ParamSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamSource::Query => "query",
            ParamSource::Form => "form",
            ParamSource::Path => "path",
            ParamSource::Header => "header",
            ParamSource::Json => "json",
        }
    }
}

impl Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primitive type a raw parameter is converted to before its rules run.
///
/// Query, form, path and header values arrive as strings; JSON values that
/// already have the target type pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
    /// Comma-separated items, each trimmed: `a, b,c`.
    List,
    /// Comma-separated `key: value` pairs: `a: 1, b: 2`.
    Dict,
    /// No conversion.
    #[default]
    Any,
}

impl ParamType {
    /// Converts a raw value to this type.
    ///
    /// # Example
    ///
    /// ```rust
    /// use reqguard::ParamType;
    /// use serde_json::json;
    ///
    /// assert_eq!(ParamType::Bool.convert(&json!("TRUE")).unwrap(), json!(true));
    /// assert_eq!(ParamType::List.convert(&json!("a, b,c")).unwrap(), json!(["a", "b", "c"]));
    /// assert_eq!(ParamType::Dict.convert(&json!("a: 1, b: x")).unwrap(), json!({"a": "1", "b": "x"}));
    /// assert!(ParamType::Int.convert(&json!("1.5")).is_err());
    /// ```
    pub fn convert(&self, value: &Value) -> Result<Value, RuleError> {
        match (self, value) {
            (ParamType::Any, v) => Ok(v.clone()),

            (ParamType::Str, Value::String(_)) => Ok(value.clone()),

            (ParamType::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            (ParamType::Int, Value::String(s)) => parse_integer(s).ok_or(RuleError::TypeConversion),

            (ParamType::Float, Value::Number(n)) => to_float(n.as_f64()),
            (ParamType::Float, Value::String(s)) => to_float(s.trim().parse::<f64>().ok()),

            (ParamType::Bool, Value::Bool(_)) => Ok(value.clone()),
            (ParamType::Bool, Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "1" | "true" => Ok(Value::Bool(true)),
                "0" | "false" => Ok(Value::Bool(false)),
                _ => Err(RuleError::TypeConversion),
            },

            (ParamType::List, Value::Array(_)) => Ok(value.clone()),
            (ParamType::List, Value::String(s)) => Ok(split_list(s)),

            (ParamType::Dict, Value::Object(_)) => Ok(value.clone()),
            (ParamType::Dict, Value::String(s)) => split_dict(s),

            _ => Err(RuleError::TypeConversion),
        }
    }
}

fn to_float(f: Option<f64>) -> Result<Value, RuleError> {
    f.and_then(JsonNumber::from_f64)
        .map(Value::Number)
        .ok_or(RuleError::TypeConversion)
}

fn split_list(s: &str) -> Value {
    if s.trim().is_empty() {
        return Value::Array(Vec::new());
    }
    Value::Array(s.split(',').map(|item| Value::String(item.trim().to_string())).collect())
}

fn split_dict(s: &str) -> Result<Value, RuleError> {
    let mut map = Map::new();
    if s.trim().is_empty() {
        return Ok(Value::Object(map));
    }
    for pair in s.split(',') {
        let (key, value) = pair.split_once(':').ok_or(RuleError::TypeConversion)?;
        map.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
    }
    Ok(Value::Object(map))
}
