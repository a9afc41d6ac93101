//! Leaf rules and rule chains.
//!
//! A [`Rule`] validates (and possibly converts) a single JSON value. Rules know
//! nothing about where the value sits in a document; [`RuleChain`] composes
//! them and the schema walk attaches the results to a [`Depth`](crate::Depth).
//!
//! Rules fall into two groups:
//!
//! - **Coercion rules** ([`Number`], [`IntRule`], [`FloatRule`], [`BoolRule`])
//!   decide whether a value is an instance of a primitive type, converting it
//!   where possible. A chain holds at most one.
//! - **Logic rules** (everything else) check a constraint on a value that
//!   already has the right type.
//!
//! # Custom rules
//!
//! ```rust
//! use reqguard::{Rule, RuleChain, RuleError};
//! use serde_json::{json, Value};
//!
//! #[derive(Debug)]
//! struct Even;
//!
//! impl Rule for Even {
//!     fn validate(&self, value: &Value) -> Result<Value, RuleError> {
//!         match value.as_i64() {
//!             Some(n) if n % 2 == 0 => Ok(value.clone()),
//!             Some(_) => Err(RuleError::custom("even", "value must be even")),
//!             None => Err(RuleError::TypeConversion),
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "Even"
//!     }
//! }
//!
//! let chain = RuleChain::builder().rule(Even).build().unwrap();
//! assert!(chain.validate(&json!(4)).is_success());
//! assert!(chain.validate(&json!(5)).is_failure());
//! ```

mod chain;
mod choice;
mod coerce;
mod datetime;
mod numeric;
mod string;

use std::fmt::Debug;

use serde_json::Value;

use crate::error::RuleError;

pub use chain::{RuleChain, RuleChainBuilder};
pub use choice::Enum;
pub use coerce::{BoolRule, FloatRule, IntRule};
pub(crate) use coerce::parse_integer;
pub use datetime::{Datetime, IsDatetimeIsoFormat, IsoDateTime};
pub use numeric::{Bound, Max, Min, Number};
pub use string::{IsEmail, MaxLength, MinLength, NotEmpty, Pattern};

/// A single-value validator.
///
/// Implementations must be stateless with respect to validation: the same rule
/// instance is shared across chains and across threads.
pub trait Rule: Send + Sync + Debug {
    /// Validates a value, returning the (possibly converted) value on success
    /// or exactly one failure.
    fn validate(&self, value: &Value) -> Result<Value, RuleError>;

    /// Returns the rule's name, used in usage errors and logs.
    fn name(&self) -> &'static str;

    /// Returns true if this rule decides the value's primitive type.
    fn is_coercion(&self) -> bool {
        false
    }
}

/// Renders a scalar the way string-oriented rules see it.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
