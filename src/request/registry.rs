//! Named route validators.
//!
//! This module provides [`RouteRegistry`], which stores the validator of each
//! route under its name so request handlers can look them up at runtime.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::data::RequestData;
use super::error::{RegistryError, RouteError};
use super::validator::{RequestValidator, ValidRequest};

type RouteMap = Arc<RwLock<HashMap<String, Arc<RequestValidator>>>>;

/// A thread-safe registry of route validators.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Cloning a registry yields a handle to the same routes.
///
/// # Example
///
/// ```rust
/// use reqguard::{Param, ParamSource, ParamType, RawRequest, RequestValidator, RouteRegistry};
///
/// let registry = RouteRegistry::new();
/// registry
///     .register(
///         "get_user",
///         RequestValidator::new().param(Param::new("id", ParamSource::Path, ParamType::Int)),
///     )
///     .unwrap();
///
/// let valid = registry.validate("get_user", &RawRequest::new().path("id", "7"));
/// assert!(valid.is_ok());
/// assert!(registry.validate("missing", &RawRequest::new()).is_err());
/// ```
#[derive(Clone, Default)]
pub struct RouteRegistry {
    routes: RouteMap,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route validator under a name.
    ///
    /// Returns an error if the name is already taken.
    pub fn register(&self, name: impl Into<String>, validator: RequestValidator) -> Result<(), RegistryError> {
        let name = name.into();
        let mut routes = self.routes.write();

        if routes.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(route = %name, params = validator.params().len(), "registered route validator");
        routes.insert(name, Arc::new(validator));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<RequestValidator>> {
        self.routes.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Returns the registered route names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.routes.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Validates a request against a registered route.
    pub fn validate<R: RequestData + ?Sized>(&self, name: &str, request: &R) -> Result<ValidRequest, RouteError> {
        let validator = self
            .get(name)
            .ok_or_else(|| RegistryError::RouteNotFound(name.to_string()))?;
        Ok(validator.validate(request)?)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<RouteRegistry>();
    assert_sync::<RouteRegistry>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Param, ParamSource, ParamType, RawRequest, RequestError};

    #[test]
    fn test_register_and_get() {
        let registry = RouteRegistry::new();
        assert!(registry.is_empty());
        registry.register("b", RequestValidator::new()).unwrap();
        registry.register("a", RequestValidator::new()).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a"));
        assert!(registry.get("c").is_none());
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_name() {
        let registry = RouteRegistry::new();
        registry.register("a", RequestValidator::new()).unwrap();
        assert_eq!(
            registry.register("a", RequestValidator::new()),
            Err(RegistryError::DuplicateName("a".to_string()))
        );
    }

    #[test]
    fn test_validate_errors() {
        let registry = RouteRegistry::new();
        registry
            .register(
                "r",
                RequestValidator::new().param(Param::new("id", ParamSource::Path, ParamType::Int)),
            )
            .unwrap();

        assert!(matches!(
            registry.validate("nope", &RawRequest::new()),
            Err(RouteError::Registry(RegistryError::RouteNotFound(_)))
        ));
        assert!(matches!(
            registry.validate("r", &RawRequest::new()),
            Err(RouteError::Request(RequestError::InvalidRequest(_)))
        ));
    }

    #[test]
    fn test_clone_shares_routes() {
        let registry = RouteRegistry::new();
        let handle = registry.clone();
        handle.register("shared", RequestValidator::new()).unwrap();
        assert!(registry.contains("shared"));
    }
}
