//! Request-level errors.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use super::source::ParamSource;
use crate::error::{PathError, RuleErrors};

/// Failures of flat parameters, keyed by parameter name.
pub type FieldErrors = IndexMap<String, RuleErrors>;

/// Failures of the JSON part of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonErrors {
    /// Failures of flat parameters read from top-level JSON keys.
    pub fields: FieldErrors,
    /// Failures reported by the nested body schema.
    pub nested: Vec<PathError>,
}

impl JsonErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.nested.is_empty()
    }
}

/// Every failure of the query, form, path and JSON parameters of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvalidRequest {
    pub query: FieldErrors,
    pub form: FieldErrors,
    pub path: FieldErrors,
    pub json: JsonErrors,
}

impl InvalidRequest {
    /// Returns the flat failures of one source.
    ///
    /// Headers are reported separately and always yield None here.
    pub fn fields(&self, source: ParamSource) -> Option<&FieldErrors> {
        match source {
            ParamSource::Query => Some(&self.query),
            ParamSource::Form => Some(&self.form),
            ParamSource::Path => Some(&self.path),
            ParamSource::Json => Some(&self.json.fields),
            ParamSource::Header => None,
        }
    }

    pub(crate) fn fields_mut(&mut self, source: ParamSource) -> Option<&mut FieldErrors> {
        match source {
            ParamSource::Query => Some(&mut self.query),
            ParamSource::Form => Some(&mut self.form),
            ParamSource::Path => Some(&mut self.path),
            ParamSource::Json => Some(&mut self.json.fields),
            ParamSource::Header => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.form.is_empty() && self.path.is_empty() && self.json.is_empty()
    }

    /// Returns the total number of failing parameters and nested nodes.
    pub fn error_count(&self) -> usize {
        self.query.len() + self.form.len() + self.path.len() + self.json.fields.len() + self.json.nested.len()
    }
}

impl Display for InvalidRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for source in [ParamSource::Query, ParamSource::Form, ParamSource::Path, ParamSource::Json] {
            if let Some(fields) = self.fields(source) {
                for (name, errors) in fields {
                    parts.push(format!("invalid {} parameter {}. {}", source, name, errors));
                }
            }
        }
        for error in &self.json.nested {
            parts.push(error.to_string());
        }
        write!(f, "{}", parts.join(". "))
    }
}

/// A failure raised by a post-validation hook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AfterParamError {
    pub message: String,
}

impl AfterParamError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// One or more headers failed. Other parameters were not checked.
    #[error("{}", format_headers(.0))]
    InvalidHeaders(FieldErrors),

    /// One or more query, form, path or JSON parameters failed.
    #[error("{0}")]
    InvalidRequest(InvalidRequest),

    /// Every parameter was valid but a post-validation hook rejected the
    /// request.
    #[error("{0}")]
    AfterParam(#[from] AfterParamError),
}

fn format_headers(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(name, errors)| format!("invalid header {}. {}", name, errors))
        .collect::<Vec<_>>()
        .join(". ")
}

/// Errors raised by [`RouteRegistry`](super::RouteRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("route '{0}' already registered")]
    DuplicateName(String),

    #[error("route '{0}' not found")]
    RouteNotFound(String),
}

/// Errors raised when validating through a [`RouteRegistry`](super::RouteRegistry).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Request(#[from] RequestError),
}
