//! Error types for validation failures.
//!
//! This module provides the error model of the crate:
//! - [`RuleError`] / [`RuleErrors`]: failures of single rules and of a rule chain
//! - [`PathError`] / [`PathErrors`]: failures collected at one depth of a JSON document
//! - [`UsageError`]: schema construction mistakes

mod path_error;
mod rule_error;
mod usage_error;

pub use path_error::{ItemError, ItemKind, NodeKind, PathError, PathErrorKind, PathErrors};
pub use rule_error::{RuleError, RuleErrors};
pub use usage_error::UsageError;
