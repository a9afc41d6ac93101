//! Numeric range rules and the `Number` type check.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use serde_json::{Number as JsonNumber, Value};

use super::Rule;
use crate::error::RuleError;

/// A numeric boundary for [`Min`] and [`Max`].
///
/// Integer bounds compare exactly against integer values; every other
/// combination compares as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Int(i64),
    Float(f64),
}

impl Bound {
    fn compare(&self, n: &JsonNumber) -> Option<Ordering> {
        match (self, n.as_i64()) {
            (Bound::Int(bound), Some(value)) => Some(value.cmp(bound)),
            (Bound::Int(bound), None) => n.as_f64()?.partial_cmp(&(*bound as f64)),
            (Bound::Float(bound), _) => n.as_f64()?.partial_cmp(bound),
        }
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Int(n) => write!(f, "{}", n),
            Bound::Float(n) => write!(f, "{}", n),
        }
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Bound::Int(n.into())
    }
}

impl From<i64> for Bound {
    fn from(n: i64) -> Self {
        Bound::Int(n)
    }
}

impl From<u32> for Bound {
    fn from(n: u32) -> Self {
        Bound::Int(n.into())
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Bound::Float(n)
    }
}

/// Rejects numbers below a bound.
///
/// The bound itself is accepted unless the rule is made [`exclusive`](Min::exclusive).
///
/// # Example
///
/// ```rust
/// use reqguard::{Min, Rule};
/// use serde_json::json;
///
/// assert!(Min::new(4).validate(&json!(4)).is_ok());
/// assert!(Min::new(4).exclusive().validate(&json!(4)).is_err());
/// assert!(Min::new(4).exclusive().validate(&json!(4.000001)).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min {
    bound: Bound,
    include_boundary: bool,
}

impl Min {
    /// Creates an inclusive lower bound.
    pub fn new(bound: impl Into<Bound>) -> Self {
        Self {
            bound: bound.into(),
            include_boundary: true,
        }
    }

    /// Excludes the bound itself.
    pub fn exclusive(self) -> Self {
        self.include_boundary(false)
    }

    /// Sets whether the bound itself is valid.
    pub fn include_boundary(mut self, include: bool) -> Self {
        self.include_boundary = include;
        self
    }
}

impl Rule for Min {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let n = match value {
            Value::Number(n) => n,
            _ => return Err(RuleError::TypeConversion),
        };
        let ok = match self.bound.compare(n) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.include_boundary,
            _ => false,
        };
        if ok {
            Ok(value.clone())
        } else {
            Err(RuleError::Min {
                bound: self.bound,
                include_boundary: self.include_boundary,
            })
        }
    }

    fn name(&self) -> &'static str {
        "Min"
    }
}

/// Rejects numbers above a bound.
///
/// The bound itself is accepted unless the rule is made [`exclusive`](Max::exclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max {
    bound: Bound,
    include_boundary: bool,
}

impl Max {
    /// Creates an inclusive upper bound.
    pub fn new(bound: impl Into<Bound>) -> Self {
        Self {
            bound: bound.into(),
            include_boundary: true,
        }
    }

    /// Excludes the bound itself.
    pub fn exclusive(self) -> Self {
        self.include_boundary(false)
    }

    /// Sets whether the bound itself is valid.
    pub fn include_boundary(mut self, include: bool) -> Self {
        self.include_boundary = include;
        self
    }
}

impl Rule for Max {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        let n = match value {
            Value::Number(n) => n,
            _ => return Err(RuleError::TypeConversion),
        };
        let ok = match self.bound.compare(n) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.include_boundary,
            _ => false,
        };
        if ok {
            Ok(value.clone())
        } else {
            Err(RuleError::Max {
                bound: self.bound,
                include_boundary: self.include_boundary,
            })
        }
    }

    fn name(&self) -> &'static str {
        "Max"
    }
}

/// Accepts any JSON number. Booleans are not numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Number;

impl Rule for Number {
    fn validate(&self, value: &Value) -> Result<Value, RuleError> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            _ => Err(RuleError::Number),
        }
    }

    fn name(&self) -> &'static str {
        "Number"
    }

    fn is_coercion(&self) -> bool {
        true
    }
}
