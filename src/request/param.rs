//! Flat request parameters.

use serde_json::Value;
use stillwater::Validation;

use super::source::{ParamSource, ParamType};
use crate::error::{RuleError, RuleErrors};
use crate::rules::RuleChain;

/// A single named request parameter.
///
/// A parameter is required by default. A missing required parameter fails
/// with [`RuleError::Required`]; a missing optional one takes its default, if
/// any, without running the rules.
///
/// # Example
///
/// ```rust
/// use reqguard::{Min, Param, ParamSource, ParamType, RuleChain};
/// use serde_json::json;
///
/// let page = Param::new("page", ParamSource::Query, ParamType::Int)
///     .optional()
///     .default(1)
///     .rules(RuleChain::builder().rule(Min::new(1)).build().unwrap());
///
/// assert_eq!(page.check(None).unwrap(), Some(json!(1)));
/// assert_eq!(page.check(Some(json!("3"))).unwrap(), Some(json!(3)));
/// assert!(page.check(Some(json!("0"))).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    source: ParamSource,
    ty: ParamType,
    required: bool,
    default: Option<Value>,
    rules: RuleChain,
}

impl Param {
    pub fn new(name: impl Into<String>, source: ParamSource, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            source,
            ty,
            required: true,
            default: None,
            rules: RuleChain::empty(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the value used when an optional parameter is missing.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the rules run after type conversion.
    pub fn rules(mut self, rules: RuleChain) -> Self {
        self.rules = rules;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> ParamSource {
        self.source
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Validates a raw value read from the request.
    ///
    /// Returns `Ok(None)` for a missing optional parameter without a default.
    pub fn check(&self, raw: Option<Value>) -> Result<Option<Value>, RuleErrors> {
        let Some(raw) = raw else {
            if self.required {
                return Err(RuleErrors::single(RuleError::Required));
            }
            return Ok(self.default.clone());
        };

        let converted = self.ty.convert(&raw)?;
        match self.rules.validate(&converted) {
            Validation::Success(value) => Ok(Some(value)),
            Validation::Failure(errors) => Err(errors),
        }
    }
}
