//! Route-level request validation.
//!
//! A [`RequestValidator`] declares the parameters of one route: flat
//! [`Param`]s read from the query string, form, path, headers or top-level
//! JSON keys, an optional nested [`JsonParam`](crate::JsonParam) for the JSON
//! body, and [`AfterParam`] hooks run once everything else has passed.
//! Requests are read through the [`RequestData`] trait so any web framework
//! can plug in.

mod data;
mod error;
mod param;
mod registry;
mod source;
mod validator;

pub use data::{RawRequest, RequestData};
pub use error::{
    AfterParamError, FieldErrors, InvalidRequest, JsonErrors, RegistryError, RequestError, RouteError,
};
pub use param::Param;
pub use registry::RouteRegistry;
pub use source::{ParamSource, ParamType};
pub use validator::{AfterParam, RequestValidator, ValidRequest};
