//! Nested JSON schemas.
//!
//! A [`JsonParam`] describes one position in a JSON document: an object with
//! named children, a list of such objects, or a list of scalars. Validation
//! walks the schema (not the document), so a deeply nested input cannot make
//! the walk go deeper than the schema itself.
//!
//! # Example
//!
//! ```rust
//! use reqguard::{JsonParam, Min, Number, RuleChain};
//! use serde_json::json;
//!
//! let schema = JsonParam::object().field(
//!     "meta",
//!     JsonParam::object().field(
//!         "buildings",
//!         JsonParam::object().field(
//!             "warehouses",
//!             JsonParam::object().field(
//!                 "large",
//!                 RuleChain::builder().rule(Number).rule(Min::new(1)).build().unwrap(),
//!             ),
//!         ),
//!     ),
//! );
//!
//! let (_, errors) = schema.validate(json!({"meta": {"buildings": {"warehouses": {"large": 0}}}}));
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].depth, ["root", "meta", "buildings", "warehouses"]);
//! assert!(errors[0].field("large").is_some());
//! ```

mod param;
mod walk;

pub use param::{Field, JsonParam, ObjectParam};
