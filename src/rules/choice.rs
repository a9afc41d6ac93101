use serde_json::Value;

use super::Rule;
use crate::error::RuleError;

/// Accepts only values equal to one of an allowed set.
///
/// # Example
///
/// ```rust
/// use reqguard::{Enum, Rule};
/// use serde_json::json;
///
/// let rule = Enum::new(["facebook", "telegram"]);
/// assert!(rule.validate(&json!("telegram")).is_ok());
/// assert!(rule.validate(&json!("fax")).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    allowed: Vec<Value>,
}

impl Enum {
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }
}

impl Rule for Enum {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        if self.allowed.contains(value) {
            Ok(value.clone())
        } else {
            Err(RuleError::Enum {
                allowed: self.allowed.clone(),
            })
        }
    }

    fn name(&self) -> &'static str {
        "Enum"
    }
}
