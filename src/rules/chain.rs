//! Ordered composition of rules.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use super::Rule;
use crate::error::{RuleError, RuleErrors, UsageError};

/// An ordered, immutable list of rules applied to one value.
///
/// The chain's coercion rule (if any) always runs first, whatever position it
/// was given in. Each rule sees the value converted by the rules before it.
///
/// A failure that short-circuits ([`RuleError::TypeConversion`] or
/// [`RuleError::Number`]) stops the chain. All other failures are collected.
///
/// # Example
///
/// ```rust
/// use reqguard::{IntRule, Max, Min, RuleChain};
/// use serde_json::json;
///
/// let chain = RuleChain::builder()
///     .rule(Min::new(1))
///     .rule(Max::new(10))
///     .rule(IntRule::new())
///     .build()
///     .unwrap();
///
/// let result = chain.validate(&json!("7"));
/// assert_eq!(result.into_result().unwrap(), json!(7));
///
/// // coercion failed, so Min and Max never ran
/// let errors = chain.validate(&json!("seven")).into_result().unwrap_err();
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleChain {
    /// Creates a chain from shared rules.
    ///
    /// Returns a usage error if more than one coercion rule is given.
    pub fn new(rules: Vec<Arc<dyn Rule>>) -> Result<Self, UsageError> {
        let coercions: Vec<&'static str> = rules
            .iter()
            .filter(|r| r.is_coercion())
            .map(|r| r.name())
            .collect();
        if coercions.len() > 1 {
            return Err(UsageError::MultipleCoercions { rules: coercions });
        }

        let mut rules = rules;
        rules.sort_by_key(|r| !r.is_coercion());
        Ok(Self { rules })
    }

    /// Creates a chain with no rules. It accepts every value unchanged.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> RuleChainBuilder {
        RuleChainBuilder::default()
    }

    /// Returns the rules in execution order.
    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule against the value.
    pub fn validate(&self, value: &Value) -> Validation<Value, RuleErrors> {
        let mut current = value.clone();
        let mut errors: Vec<RuleError> = Vec::new();

        for rule in &self.rules {
            match rule.validate(&current) {
                Ok(converted) => current = converted,
                Err(error) => {
                    let stop = error.short_circuits();
                    errors.push(error);
                    if stop {
                        break;
                    }
                }
            }
        }

        match RuleErrors::from_vec(errors) {
            None => Validation::Success(current),
            Some(errors) => Validation::Failure(errors),
        }
    }
}

/// Builder for [`RuleChain`].
#[derive(Debug, Default)]
pub struct RuleChainBuilder {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleChainBuilder {
    /// Appends a rule.
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Appends a rule that is shared with other chains.
    pub fn shared(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Result<RuleChain, UsageError> {
        RuleChain::new(self.rules)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<RuleChain>();
    assert_sync::<RuleChain>();
};
