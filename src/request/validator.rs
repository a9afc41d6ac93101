//! Whole-request validation.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::data::RequestData;
use super::error::{AfterParamError, FieldErrors, InvalidRequest, RequestError};
use super::param::Param;
use super::source::ParamSource;
use crate::schema::JsonParam;

/// A check run after every parameter has passed and been converted.
///
/// Hooks see the whole validated request, so they can enforce constraints
/// that span several parameters. Closures of the right shape implement this
/// trait.
pub trait AfterParam: Send + Sync {
    fn validate(&self, request: &ValidRequest) -> Result<(), AfterParamError>;
}

impl<F> AfterParam for F
where
    F: Fn(&ValidRequest) -> Result<(), AfterParamError> + Send + Sync,
{
    fn validate(&self, request: &ValidRequest) -> Result<(), AfterParamError> {
        self(request)
    }
}

/// The converted parameters of a request that passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidRequest {
    query: IndexMap<String, Value>,
    form: IndexMap<String, Value>,
    path: IndexMap<String, Value>,
    headers: IndexMap<String, Value>,
    json_params: IndexMap<String, Value>,
    json: Option<Value>,
}

impl ValidRequest {
    fn params_mut(&mut self, source: ParamSource) -> &mut IndexMap<String, Value> {
        match source {
            ParamSource::Query => &mut self.query,
            ParamSource::Form => &mut self.form,
            ParamSource::Path => &mut self.path,
            ParamSource::Header => &mut self.headers,
            ParamSource::Json => &mut self.json_params,
        }
    }

    /// Returns the converted flat parameters of one source.
    pub fn params(&self, source: ParamSource) -> &IndexMap<String, Value> {
        match source {
            ParamSource::Query => &self.query,
            ParamSource::Form => &self.form,
            ParamSource::Path => &self.path,
            ParamSource::Header => &self.headers,
            ParamSource::Json => &self.json_params,
        }
    }

    /// Returns one converted flat parameter.
    pub fn get(&self, source: ParamSource, name: &str) -> Option<&Value> {
        self.params(source).get(name)
    }

    pub fn query(&self) -> &IndexMap<String, Value> {
        &self.query
    }

    pub fn form(&self) -> &IndexMap<String, Value> {
        &self.form
    }

    pub fn path(&self) -> &IndexMap<String, Value> {
        &self.path
    }

    pub fn headers(&self) -> &IndexMap<String, Value> {
        &self.headers
    }

    /// Returns the JSON body converted by the nested body schema.
    ///
    /// None when no body schema is configured.
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }
}

/// The declared parameters of one route.
///
/// Validation runs in three stages, each only if the previous one passed:
///
/// 1. headers, reported as [`RequestError::InvalidHeaders`];
/// 2. query, form, path and JSON parameters together with the nested JSON
///    body, all reported at once as [`RequestError::InvalidRequest`];
/// 3. post-validation hooks in registration order, the first failure
///    reported as [`RequestError::AfterParam`].
///
/// # Example
///
/// ```rust
/// use reqguard::{
///     IsEmail, JsonParam, Param, ParamSource, ParamType, RawRequest, RequestValidator, RuleChain,
/// };
/// use serde_json::json;
///
/// let validator = RequestValidator::new()
///     .param(Param::new("page", ParamSource::Query, ParamType::Int))
///     .json(JsonParam::object().field("email", RuleChain::builder().rule(IsEmail).build().unwrap()));
///
/// let request = RawRequest::new()
///     .query("page", "2")
///     .json(json!({"email": "ann@example.com"}));
///
/// let valid = validator.validate(&request).unwrap();
/// assert_eq!(valid.get(ParamSource::Query, "page"), Some(&json!(2)));
///
/// let bad = RawRequest::new().query("page", "two").json(json!({"email": "nope"}));
/// assert!(validator.validate(&bad).is_err());
/// ```
#[derive(Clone, Default)]
pub struct RequestValidator {
    params: Vec<Param>,
    json: Option<JsonParam>,
    after: Vec<Arc<dyn AfterParam>>,
}

impl RequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a flat parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the schema of the JSON body.
    pub fn json(mut self, schema: impl Into<JsonParam>) -> Self {
        self.json = Some(schema.into());
        self
    }

    /// Adds a post-validation hook.
    pub fn after<A: AfterParam + 'static>(mut self, hook: A) -> Self {
        self.after.push(Arc::new(hook));
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn json_schema(&self) -> Option<&JsonParam> {
        self.json.as_ref()
    }

    /// Validates a request.
    pub fn validate<R: RequestData + ?Sized>(&self, request: &R) -> Result<ValidRequest, RequestError> {
        let mut valid = ValidRequest::default();

        let mut header_errors = FieldErrors::new();
        for param in self.params.iter().filter(|p| p.source() == ParamSource::Header) {
            let raw = request.value(ParamSource::Header, &param.name().to_lowercase());
            match param.check(raw) {
                Ok(Some(value)) => {
                    valid.headers.insert(param.name().to_string(), value);
                }
                Ok(None) => {}
                Err(errors) => {
                    header_errors.insert(param.name().to_string(), errors);
                }
            }
        }
        if !header_errors.is_empty() {
            tracing::debug!(headers = header_errors.len(), "request headers invalid");
            return Err(RequestError::InvalidHeaders(header_errors));
        }

        let mut invalid = InvalidRequest::default();
        for param in self.params.iter().filter(|p| p.source() != ParamSource::Header) {
            let source = param.source();
            match param.check(request.value(source, param.name())) {
                Ok(Some(value)) => {
                    valid.params_mut(source).insert(param.name().to_string(), value);
                }
                Ok(None) => {}
                Err(errors) => {
                    if let Some(fields) = invalid.fields_mut(source) {
                        fields.insert(param.name().to_string(), errors);
                    }
                }
            }
        }

        if let Some(schema) = &self.json {
            let body = request.json_body().unwrap_or(Value::Null);
            let (body, errors) = schema.validate(body);
            invalid.json.nested = errors;
            valid.json = Some(body);
        }

        if !invalid.is_empty() {
            tracing::debug!(errors = invalid.error_count(), "request parameters invalid");
            return Err(RequestError::InvalidRequest(invalid));
        }

        for hook in &self.after {
            hook.validate(&valid)?;
        }

        Ok(valid)
    }
}

impl fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestValidator")
            .field("params", &self.params)
            .field("json", &self.json)
            .field("after", &self.after.len())
            .finish()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<RequestValidator>();
    assert_sync::<RequestValidator>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ParamType, RawRequest};
    use crate::rules::{Min, Number, RuleChain};
    use serde_json::json;

    #[test]
    fn test_headers_checked_first() {
        let validator = RequestValidator::new()
            .param(Param::new("x-token", ParamSource::Header, ParamType::Str))
            .param(Param::new("page", ParamSource::Query, ParamType::Int));
        let err = validator.validate(&RawRequest::new().query("page", "x")).unwrap_err();
        match err {
            RequestError::InvalidHeaders(fields) => {
                assert_eq!(fields.len(), 1);
                assert!(fields.contains_key("x-token"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    /// A request whose headers are stored lowercased and looked up exactly.
    struct LowercaseHeaders(IndexMap<String, Value>);

    impl RequestData for LowercaseHeaders {
        fn value(&self, source: ParamSource, name: &str) -> Option<Value> {
            match source {
                ParamSource::Header => self.0.get(name).cloned(),
                _ => None,
            }
        }

        fn json_body(&self) -> Option<Value> {
            None
        }
    }

    #[test]
    fn test_header_names_are_lowercased_for_lookup() {
        let validator = RequestValidator::new().param(Param::new("X-Token", ParamSource::Header, ParamType::Str));
        let mut headers = IndexMap::new();
        headers.insert("x-token".to_string(), json!("abc"));

        let valid = validator.validate(&LowercaseHeaders(headers)).unwrap();
        assert_eq!(valid.get(ParamSource::Header, "X-Token"), Some(&json!("abc")));
    }

    #[test]
    fn test_all_sources_reported_together() {
        let validator = RequestValidator::new()
            .param(Param::new("page", ParamSource::Query, ParamType::Int))
            .param(Param::new("name", ParamSource::Form, ParamType::Str))
            .param(Param::new("id", ParamSource::Path, ParamType::Int))
            .json(JsonParam::object().field("n", RuleChain::builder().rule(Number).build().unwrap()));
        let request = RawRequest::new().query("page", "x").path("id", "1").json(json!({"n": "x"}));

        match validator.validate(&request).unwrap_err() {
            RequestError::InvalidRequest(invalid) => {
                assert!(invalid.query.contains_key("page"));
                assert!(invalid.form.contains_key("name"));
                assert!(invalid.path.is_empty());
                assert_eq!(invalid.json.nested.len(), 1);
                assert_eq!(invalid.error_count(), 3);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_body_fails_required_schema() {
        let validator = RequestValidator::new().json(JsonParam::object());
        match validator.validate(&RawRequest::new()).unwrap_err() {
            RequestError::InvalidRequest(invalid) => {
                assert!(invalid.json.nested[0].is_shape_mismatch());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_after_hooks_see_converted_values() {
        let validator = RequestValidator::new()
            .param(Param::new("from", ParamSource::Query, ParamType::Int))
            .param(Param::new("to", ParamSource::Query, ParamType::Int))
            .after(|req: &ValidRequest| -> Result<(), AfterParamError> {
                let from = req.get(ParamSource::Query, "from").and_then(Value::as_i64);
                let to = req.get(ParamSource::Query, "to").and_then(Value::as_i64);
                if from > to {
                    return Err(AfterParamError::new("from must not exceed to"));
                }
                Ok(())
            });

        assert!(validator
            .validate(&RawRequest::new().query("from", "1").query("to", "2"))
            .is_ok());
        assert_eq!(
            validator
                .validate(&RawRequest::new().query("from", "3").query("to", "2"))
                .unwrap_err(),
            RequestError::AfterParam(AfterParamError::new("from must not exceed to"))
        );
    }

    #[test]
    fn test_after_hooks_skipped_on_invalid_params() {
        let validator = RequestValidator::new()
            .param(Param::new("n", ParamSource::Query, ParamType::Int))
            .after(|_: &ValidRequest| -> Result<(), AfterParamError> { Err(AfterParamError::new("never")) });
        assert!(matches!(
            validator.validate(&RawRequest::new()),
            Err(RequestError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_valid_request_contents() {
        let validator = RequestValidator::new()
            .param(Param::new("x-count", ParamSource::Header, ParamType::Int))
            .param(
                Param::new("limit", ParamSource::Query, ParamType::Int)
                    .optional()
                    .default(10)
                    .rules(RuleChain::builder().rule(Min::new(1)).build().unwrap()),
            )
            .param(Param::new("name", ParamSource::Json, ParamType::Str))
            .json(JsonParam::object().field("age", RuleChain::builder().rule(crate::rules::IntRule::new()).build().unwrap()));

        let request = RawRequest::new()
            .header("X-Count", "5")
            .json(json!({"name": "ann", "age": "30"}));
        let valid = validator.validate(&request).unwrap();

        assert_eq!(valid.headers().get("x-count"), Some(&json!(5)));
        assert_eq!(valid.query().get("limit"), Some(&json!(10)));
        assert_eq!(valid.get(ParamSource::Json, "name"), Some(&json!("ann")));
        assert_eq!(valid.json(), Some(&json!({"name": "ann", "age": 30})));
        assert!(valid.form().is_empty());
        assert!(valid.path().is_empty());
    }
}
