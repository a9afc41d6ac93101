//! Type-coercion rules.
//!
//! Each rule here decides whether a value is an instance of one primitive type
//! and converts textual input into it. A [`RuleChain`](super::RuleChain) runs
//! its coercion rule before any logic rule and holds at most one.

use serde_json::{Number as JsonNumber, Value};

use super::Rule;
use crate::error::RuleError;

/// Accepts integers, parsing numeric strings unless strict.
///
/// # Example
///
/// ```rust
/// use reqguard::{IntRule, Rule};
/// use serde_json::json;
///
/// assert_eq!(IntRule::new().validate(&json!("7")).unwrap(), json!(7));
/// assert!(IntRule::strict().validate(&json!("7")).is_err());
/// assert!(IntRule::new().validate(&json!(7.5)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRule {
    str_to_int: bool,
}

impl IntRule {
    pub fn new() -> Self {
        Self { str_to_int: true }
    }

    /// Only accepts values that are already JSON integers.
    pub fn strict() -> Self {
        Self { str_to_int: false }
    }
}

/// Parses a decimal integer, accepting the full `i64` and `u64` ranges like
/// JSON numbers do.
pub(crate) fn parse_integer(s: &str) -> Option<Value> {
    let s = s.trim();
    s.parse::<i64>()
        .map(Value::from)
        .or_else(|_| s.parse::<u64>().map(Value::from))
        .ok()
}

impl Default for IntRule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for IntRule {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::String(s) if self.str_to_int => parse_integer(s).ok_or(RuleError::TypeConversion),
            _ => Err(RuleError::TypeConversion),
        }
    }

    fn name(&self) -> &'static str {
        "IntRule"
    }

    fn is_coercion(&self) -> bool {
        true
    }
}

/// Accepts any number as a float and parses float strings.
///
/// Strings are parsed as-is first. If that fails, each configured delimiter is
/// tried in turn as the decimal separator.
///
/// # Example
///
/// ```rust
/// use reqguard::{FloatRule, Rule};
/// use serde_json::json;
///
/// let rule = FloatRule::new().delimiters([',']);
/// assert_eq!(rule.validate(&json!("9,99")).unwrap(), json!(9.99));
/// assert_eq!(rule.validate(&json!("9.99")).unwrap(), json!(9.99));
/// assert!(rule.validate(&json!("nine")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatRule {
    delimiters: Vec<char>,
}

impl FloatRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds characters accepted as the decimal separator.
    pub fn delimiters(mut self, delimiters: impl IntoIterator<Item = char>) -> Self {
        self.delimiters.extend(delimiters);
        self
    }

    fn parse(&self, s: &str) -> Option<f64> {
        let s = s.trim();
        if let Ok(f) = s.parse::<f64>() {
            return Some(f);
        }
        self.delimiters
            .iter()
            .find_map(|d| s.replacen(*d, ".", 1).parse::<f64>().ok())
    }
}

impl Rule for FloatRule {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => self.parse(s),
            _ => None,
        };
        parsed
            .and_then(JsonNumber::from_f64)
            .map(Value::Number)
            .ok_or(RuleError::TypeConversion)
    }

    fn name(&self) -> &'static str {
        "FloatRule"
    }

    fn is_coercion(&self) -> bool {
        true
    }
}

/// Accepts booleans and converts configured yes/no values.
///
/// String input is lower-cased before it is compared, so configure string
/// values in lower case.
///
/// # Example
///
/// ```rust
/// use reqguard::{BoolRule, Rule};
/// use serde_json::json;
///
/// let rule = BoolRule::new().yes("plus").yes(1).no("minus").no(0);
/// assert_eq!(rule.validate(&json!("PluS")).unwrap(), json!(true));
/// assert_eq!(rule.validate(&json!(0)).unwrap(), json!(false));
/// assert!(rule.validate(&json!("maybe")).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolRule {
    yes: Vec<Value>,
    no: Vec<Value>,
}

impl BoolRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value that converts to `true`.
    pub fn yes(mut self, value: impl Into<Value>) -> Self {
        self.yes.push(lowercase(value.into()));
        self
    }

    /// Adds a value that converts to `false`.
    pub fn no(mut self, value: impl Into<Value>) -> Self {
        self.no.push(lowercase(value.into()));
        self
    }

    fn lookup(&self, key: &Value) -> Option<bool> {
        if self.yes.contains(key) {
            Some(true)
        } else if self.no.contains(key) {
            Some(false)
        } else {
            None
        }
    }
}

fn lowercase(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other,
    }
}

impl Rule for BoolRule {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let converted = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) if n.is_i64() || n.is_u64() => self.lookup(value),
            Value::String(s) => self.lookup(&Value::String(s.to_lowercase())),
            _ => None,
        };
        converted.map(Value::Bool).ok_or(RuleError::TypeConversion)
    }

    fn name(&self) -> &'static str {
        "BoolRule"
    }

    fn is_coercion(&self) -> bool {
        true
    }
}
