//! Rule failure types.
//!
//! This module provides [`RuleError`] for the failure of a single rule and
//! [`RuleErrors`] for the failures a rule chain accumulated for one value.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::rules::Bound;

/// The failure of a single rule.
///
/// Every variant carries exactly the parameters needed to reproduce a precise
/// message for its rule kind: the configured bound of a `Min`, the pattern text
/// of a `Pattern`, the allowed set of an `Enum`, and so on.
///
/// # Example
///
/// ```rust
/// use reqguard::RuleError;
///
/// let error = RuleError::MinLength { length: 3 };
/// assert_eq!(error.code(), "min_length");
/// assert_eq!(error.to_string(), "invalid length, min length = 3");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    /// The value's type cannot be interpreted by the rule at all.
    #[error("invalid type")]
    TypeConversion,

    /// A required request parameter is absent.
    #[error("value is required")]
    Required,

    /// A required key is absent from a JSON object.
    #[error("key is required")]
    MissingKey { key: String },

    #[error("value does not match pattern {pattern}")]
    Pattern { pattern: String },

    #[error("not allowed, allowed values: {}", join_allowed(.allowed))]
    Enum { allowed: Vec<Value> },

    #[error("invalid length, max length = {length}")]
    MaxLength { length: usize },

    #[error("invalid length, min length = {length}")]
    MinLength { length: usize },

    #[error("greater than allowed: value is not {} {bound}", max_op(.include_boundary))]
    Max { bound: Bound, include_boundary: bool },

    #[error("smaller than allowed: value is not {} {bound}", min_op(.include_boundary))]
    Min { bound: Bound, include_boundary: bool },

    #[error("empty string not allowed")]
    Empty,

    #[error("expected a datetime in ISO format")]
    DtIsoFormat,

    #[error("invalid email address")]
    Email,

    /// The value is not a JSON number.
    #[error("expected number")]
    Number,

    #[error("expected a datetime in {format} format")]
    Datetime { format: String },

    /// A failure reported by a user-defined rule.
    #[error("{message}")]
    Custom { code: String, message: String },
}

impl RuleError {
    /// Creates a failure for a user-defined rule.
    pub fn custom(code: impl Into<String>, message: impl Into<String>) -> Self {
        RuleError::Custom {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Returns a machine-readable code for the failure.
    pub fn code(&self) -> &str {
        match self {
            RuleError::TypeConversion => "invalid_type",
            RuleError::Required => "required",
            RuleError::MissingKey { .. } => "missing_key",
            RuleError::Pattern { .. } => "pattern",
            RuleError::Enum { .. } => "enum",
            RuleError::MaxLength { .. } => "max_length",
            RuleError::MinLength { .. } => "min_length",
            RuleError::Max { .. } => "max_value",
            RuleError::Min { .. } => "min_value",
            RuleError::Empty => "empty",
            RuleError::DtIsoFormat => "datetime_iso",
            RuleError::Email => "email",
            RuleError::Number => "number",
            RuleError::Datetime { .. } => "datetime",
            RuleError::Custom { code, .. } => code.as_str(),
        }
    }

    /// Returns true if this failure stops the rest of a rule chain.
    ///
    /// Type-level failures mean the value was never an instance of the target
    /// type, so later logical checks are not run against it.
    pub fn short_circuits(&self) -> bool {
        matches!(self, RuleError::TypeConversion | RuleError::Number)
    }
}

fn join_allowed(allowed: &[Value]) -> String {
    allowed
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn max_op(include_boundary: &bool) -> &'static str {
    if *include_boundary {
        "<="
    } else {
        "<"
    }
}

fn min_op(include_boundary: &bool) -> &'static str {
    if *include_boundary {
        ">="
    } else {
        ">"
    }
}

/// The non-empty list of rule failures collected for one value.
///
/// `RuleErrors` wraps a `NonEmptyVec<RuleError>` so a failed chain always
/// reports at least one failure. Failures keep rule order.
///
/// # Example
///
/// ```rust
/// use reqguard::{RuleError, RuleErrors};
/// use stillwater::prelude::*;
///
/// let errors = RuleErrors::single(RuleError::Email)
///     .combine(RuleErrors::single(RuleError::MaxLength { length: 5 }));
///
/// assert_eq!(errors.len(), 2);
/// assert_eq!(errors.to_string(), "invalid email address. invalid length, max length = 5");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleErrors(NonEmptyVec<RuleError>);

impl RuleErrors {
    /// Creates a `RuleErrors` holding a single failure.
    pub fn single(error: RuleError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `RuleErrors` from a vec, or None if the vec is empty.
    pub fn from_vec(errors: Vec<RuleError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = errors.next()?;
        Some(errors.fold(Self::single(head), |acc, e| acc.combine(Self::single(e))))
    }

    /// Returns the number of failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the failures in rule order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleError> {
        self.0.iter()
    }

    /// Returns the first failure.
    pub fn first(&self) -> &RuleError {
        self.0.head()
    }

    /// Returns true if any failure has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.0.iter().any(|e| e.code() == code)
    }

    /// Converts this collection into a `Vec<RuleError>`.
    pub fn into_vec(self) -> Vec<RuleError> {
        self.0.into_vec()
    }
}

impl Semigroup for RuleErrors {
    fn combine(self, other: Self) -> Self {
        RuleErrors(self.0.combine(other.0))
    }
}

impl Display for RuleErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join(". "))
    }
}

impl std::error::Error for RuleErrors {}

impl From<RuleError> for RuleErrors {
    fn from(error: RuleError) -> Self {
        RuleErrors::single(error)
    }
}

impl IntoIterator for RuleErrors {
    type Item = RuleError;
    type IntoIter = std::vec::IntoIter<RuleError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<RuleErrors>();
    assert_sync::<RuleErrors>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_messages_echo_parameters() {
        assert_eq!(
            RuleError::Pattern {
                pattern: r"^\d+$".to_string()
            }
            .to_string(),
            r"value does not match pattern ^\d+$"
        );
        assert_eq!(
            RuleError::Datetime {
                format: "%Y-%m-%d".to_string()
            }
            .to_string(),
            "expected a datetime in %Y-%m-%d format"
        );
        assert_eq!(RuleError::MaxLength { length: 6 }.to_string(), "invalid length, max length = 6");
    }

    #[test]
    fn test_boundary_messages() {
        let inclusive = RuleError::Min {
            bound: Bound::Int(4),
            include_boundary: true,
        };
        let exclusive = RuleError::Min {
            bound: Bound::Int(4),
            include_boundary: false,
        };
        assert_eq!(inclusive.to_string(), "smaller than allowed: value is not >= 4");
        assert_eq!(exclusive.to_string(), "smaller than allowed: value is not > 4");

        let max = RuleError::Max {
            bound: Bound::Float(9.5),
            include_boundary: false,
        };
        assert_eq!(max.to_string(), "greater than allowed: value is not < 9.5");
    }

    #[test]
    fn test_enum_message() {
        let error = RuleError::Enum {
            allowed: vec![json!("facebook"), json!("telegram"), json!(7)],
        };
        assert_eq!(error.to_string(), "not allowed, allowed values: facebook|telegram|7");
    }

    #[test]
    fn test_short_circuit_classification() {
        assert!(RuleError::TypeConversion.short_circuits());
        assert!(RuleError::Number.short_circuits());
        assert!(!RuleError::Email.short_circuits());
        assert!(!RuleError::MinLength { length: 1 }.short_circuits());
    }

    #[test]
    fn test_custom_error() {
        let error = RuleError::custom("even", "value must be even");
        assert_eq!(error.code(), "even");
        assert_eq!(error.to_string(), "value must be even");
    }

    #[test]
    fn test_rule_errors_combine_keeps_order() {
        let errors = RuleErrors::single(RuleError::Empty)
            .combine(RuleErrors::single(RuleError::Email))
            .combine(RuleErrors::single(RuleError::DtIsoFormat));

        let codes: Vec<_> = errors.iter().map(|e| e.code().to_string()).collect();
        assert_eq!(codes, vec!["empty", "email", "datetime_iso"]);
        assert_eq!(errors.first(), &RuleError::Empty);
        assert!(errors.has_code("email"));
        assert!(!errors.has_code("pattern"));
    }

    #[test]
    fn test_rule_errors_from_vec() {
        assert!(RuleErrors::from_vec(vec![]).is_none());
        let errors = RuleErrors::from_vec(vec![RuleError::Number]).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
        assert_eq!(errors.into_vec(), vec![RuleError::Number]);
    }
}
