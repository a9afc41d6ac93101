//! String and length rules.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::{scalar_text, Rule};
use crate::error::{RuleError, UsageError};

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[a-zA-Z0-9]+$").expect("email regex is valid")
    })
}

/// Checks that a value contains a match for a regular expression.
///
/// Numbers and booleans are matched against their textual form. The pattern
/// is searched for, not anchored; use `^...$` for a full match.
///
/// # Example
///
/// ```rust
/// use reqguard::{Pattern, Rule};
/// use serde_json::json;
///
/// let rule = Pattern::new(r"^\d{3}$").unwrap();
/// assert!(rule.validate(&json!("123")).is_ok());
/// assert!(rule.validate(&json!(123)).is_ok());
/// assert!(rule.validate(&json!("12")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles the pattern.
    ///
    /// Returns a usage error if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, UsageError> {
        let regex = Regex::new(pattern).map_err(|source| UsageError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Returns the pattern source text.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Rule for Pattern {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let text = scalar_text(value).ok_or(RuleError::TypeConversion)?;
        if self.regex.is_match(&text) {
            Ok(value.clone())
        } else {
            Err(RuleError::Pattern {
                pattern: self.regex.as_str().to_string(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "Pattern"
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        _ => None,
    }
}

/// Rejects strings, arrays or objects shorter than the given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength(pub usize);

impl Rule for MinLength {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let len = length_of(value).ok_or(RuleError::TypeConversion)?;
        if len < self.0 {
            return Err(RuleError::MinLength { length: self.0 });
        }
        Ok(value.clone())
    }

    fn name(&self) -> &'static str {
        "MinLength"
    }
}

/// Rejects strings, arrays or objects longer than the given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength(pub usize);

impl Rule for MaxLength {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let len = length_of(value).ok_or(RuleError::TypeConversion)?;
        if len > self.0 {
            return Err(RuleError::MaxLength { length: self.0 });
        }
        Ok(value.clone())
    }

    fn name(&self) -> &'static str {
        "MaxLength"
    }
}

/// Trims a string and rejects it if nothing is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl Rule for NotEmpty {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let s = value.as_str().ok_or(RuleError::TypeConversion)?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RuleError::Empty);
        }
        Ok(Value::String(trimmed.to_string()))
    }

    fn name(&self) -> &'static str {
        "NotEmpty"
    }
}

/// Checks that a string looks like an email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsEmail;

impl Rule for IsEmail {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let s = value.as_str().ok_or(RuleError::TypeConversion)?;
        if email_regex().is_match(s) {
            Ok(value.clone())
        } else {
            Err(RuleError::Email)
        }
    }

    fn name(&self) -> &'static str {
        "IsEmail"
    }
}
