//! # Reqguard
//!
//! Declarative request validation that reports ALL failures of a request,
//! including every failure inside a nested JSON body, rather than stopping at
//! the first one.
//!
//! ## Overview
//!
//! Validation is built from three layers:
//!
//! - **Rules** check (and possibly convert) a single value. A [`RuleChain`]
//!   runs an ordered list of rules, coercion first, collecting every logic
//!   failure and stopping only when the value has the wrong type.
//! - **[`JsonParam`]** describes the shape of a JSON document: objects with
//!   named children, lists of objects and lists of scalars. Validating a
//!   document walks the schema and returns the converted document plus a
//!   [`PathError`] for every failing node, tagged with its [`Depth`].
//! - **[`RequestValidator`]** ties flat query, form, path, header and JSON
//!   parameters to a body schema and post-validation hooks.
//!
//! Failures accumulate through stillwater's `Validation` type.
//!
//! ## Example
//!
//! ```rust
//! use reqguard::{IsEmail, JsonParam, MinLength, Number, RuleChain};
//! use serde_json::json;
//!
//! let schema = JsonParam::object()
//!     .field("age", RuleChain::builder().rule(Number).build().unwrap())
//!     .field(
//!         "contacts",
//!         JsonParam::object().field("email", RuleChain::builder().rule(IsEmail).build().unwrap()),
//!     )
//!     .field(
//!         "tags",
//!         JsonParam::scalar_list(RuleChain::builder().rule(MinLength(1)).build().unwrap()).optional(),
//!     );
//!
//! let (_, errors) = schema.validate(json!({
//!     "age": "old",
//!     "contacts": {"email": "not-an-email"},
//! }));
//!
//! // the nested failure is reported first, then the root's own failures
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[0].depth.to_string(), "root|contacts");
//! assert_eq!(errors[1].depth.to_string(), "root");
//! ```

pub mod depth;
pub mod error;
pub mod report;
pub mod request;
pub mod rules;
pub mod schema;

pub use depth::Depth;
pub use error::{
    ItemError, ItemKind, NodeKind, PathError, PathErrorKind, PathErrors, RuleError, RuleErrors, UsageError,
};
pub use request::{
    AfterParam, AfterParamError, FieldErrors, InvalidRequest, JsonErrors, Param, ParamSource, ParamType,
    RawRequest, RegistryError, RequestData, RequestError, RequestValidator, RouteError, RouteRegistry,
    ValidRequest,
};
pub use rules::{
    BoolRule, Bound, Datetime, Enum, FloatRule, IntRule, IsDatetimeIsoFormat, IsEmail, IsoDateTime, Max,
    MaxLength, Min, MinLength, NotEmpty, Number, Pattern, Rule, RuleChain, RuleChainBuilder,
};
pub use schema::{Field, JsonParam, ObjectParam};

/// Type alias for validation results of a JSON document.
pub type ValidationResult<T> = stillwater::Validation<T, PathErrors>;
