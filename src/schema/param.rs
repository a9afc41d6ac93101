//! Schema node definitions.

use std::ops::Deref;

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::Validation;

use crate::depth::Depth;
use crate::error::{PathError, PathErrors};
use crate::rules::RuleChain;

/// A child of an object schema.
#[derive(Debug, Clone)]
pub enum Field {
    /// A scalar field validated by a rule chain.
    ///
    /// A leaf whose key is absent is skipped unless `required` is set, in which
    /// case the absence is reported as a missing key.
    Leaf { rules: RuleChain, required: bool },
    /// A nested object or list.
    Nested(JsonParam),
}

impl Field {
    /// Creates a leaf that must be present.
    pub fn required(rules: RuleChain) -> Self {
        Field::Leaf { rules, required: true }
    }

    /// Returns true if the key must be present in its parent object.
    pub fn is_required(&self) -> bool {
        match self {
            Field::Leaf { required, .. } => *required,
            Field::Nested(node) => node.is_required(),
        }
    }
}

impl From<RuleChain> for Field {
    fn from(rules: RuleChain) -> Self {
        Field::Leaf { rules, required: false }
    }
}

impl From<JsonParam> for Field {
    fn from(node: JsonParam) -> Self {
        Field::Nested(node)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Object(IndexMap<String, Field>),
    ObjectList(IndexMap<String, Field>),
    ScalarList(RuleChain),
}

/// A schema node for a JSON value.
///
/// A node is exactly one of:
///
/// - an object with named children ([`JsonParam::object`]),
/// - a list of objects sharing those children ([`JsonParam::object_list`]),
/// - a list of scalars sharing one rule chain ([`JsonParam::scalar_list`]).
///
/// Nodes are required by default: a required nested node whose key is absent
/// from its parent is reported as a missing key. An optional node that is
/// absent or `null` is skipped along with everything below it.
///
/// Nodes are immutable once built and may be shared across threads.
///
/// # Example
///
/// ```rust
/// use reqguard::{JsonParam, MinLength, Number, RuleChain};
/// use serde_json::json;
///
/// let schema = JsonParam::object_list()
///     .field("age", RuleChain::builder().rule(Number).build().unwrap())
///     .field(
///         "tags",
///         JsonParam::object_list()
///             .field("name", RuleChain::builder().rule(MinLength(1)).build().unwrap())
///             .optional(),
///     );
///
/// let (_, errors) = schema.validate(json!([{"age": "ab"}]));
///
/// assert_eq!(errors.len(), 1);
/// assert!(errors[0].is_sequence_context());
/// assert_eq!(errors[0].depth, ["root"]);
/// ```
#[derive(Debug, Clone)]
pub struct JsonParam {
    pub(crate) shape: Shape,
    pub(crate) required: bool,
}

impl JsonParam {
    /// Creates an object node with no children.
    pub fn object() -> ObjectParam {
        ObjectParam(Self {
            shape: Shape::Object(IndexMap::new()),
            required: true,
        })
    }

    /// Creates a node for a list of objects with no children.
    pub fn object_list() -> ObjectParam {
        Self::object().as_list()
    }

    /// Creates a node for a list of scalars, each validated by `rules`.
    ///
    /// Scalar lists have no named children, so the result has no `field`
    /// method:
    ///
    /// ```compile_fail
    /// use reqguard::{JsonParam, RuleChain};
    ///
    /// let node = JsonParam::scalar_list(RuleChain::empty()).field("x", RuleChain::empty());
    /// ```
    pub fn scalar_list(rules: RuleChain) -> Self {
        Self {
            shape: Shape::ScalarList(rules),
            required: true,
        }
    }

    /// Marks this node as optional in its parent object.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns true if this node expects a JSON array.
    pub fn is_sequence(&self) -> bool {
        !matches!(self.shape, Shape::Object(_))
    }

    /// Returns the named children, or None for a scalar list.
    pub fn fields(&self) -> Option<&IndexMap<String, Field>> {
        match &self.shape {
            Shape::Object(fields) | Shape::ObjectList(fields) => Some(fields),
            Shape::ScalarList(_) => None,
        }
    }

    /// Validates a document rooted at this node.
    ///
    /// Returns the document with converted values written back, along with
    /// every failure found. An empty error list means the document is valid.
    pub fn validate(&self, value: Value) -> (Value, Vec<PathError>) {
        self.validate_at(value, &Depth::root())
    }

    /// Validates a value sitting at `depth` in a larger document.
    pub fn validate_at(&self, value: Value, depth: &Depth) -> (Value, Vec<PathError>) {
        let (value, errors) = self.walk(value, depth);
        if !errors.is_empty() {
            tracing::debug!(depth = %depth, errors = errors.len(), "json validation failed");
        }
        (value, errors)
    }

    /// Validates a document, returning the converted document or all failures.
    pub fn check(&self, value: Value) -> Validation<Value, PathErrors> {
        let (value, errors) = self.validate(value);
        match PathErrors::from_vec(errors) {
            None => Validation::Success(value),
            Some(errors) => Validation::Failure(errors),
        }
    }
}

/// Builder for object and object-list nodes.
///
/// Returned by [`JsonParam::object`] and [`JsonParam::object_list`]. It
/// dereferences to the [`JsonParam`] it builds, so it can be validated
/// directly, and converts into a [`JsonParam`] or [`Field`] wherever one is
/// expected.
#[derive(Debug, Clone)]
pub struct ObjectParam(JsonParam);

impl ObjectParam {
    /// Turns an object node into a list of such objects.
    pub fn as_list(mut self) -> Self {
        self.0.shape = match self.0.shape {
            Shape::Object(fields) => Shape::ObjectList(fields),
            other => other,
        };
        self
    }

    /// Adds a child. Children are validated in the order they are added.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        if let Shape::Object(fields) | Shape::ObjectList(fields) = &mut self.0.shape {
            fields.insert(name.into(), field.into());
        }
        self
    }

    /// Adds a leaf child whose absence is reported as a missing key.
    pub fn required_field(self, name: impl Into<String>, rules: RuleChain) -> Self {
        self.field(name, Field::required(rules))
    }

    /// Marks this node as optional in its parent object.
    pub fn optional(self) -> Self {
        Self(self.0.optional())
    }

    /// Finishes the builder.
    pub fn build(self) -> JsonParam {
        self.0
    }
}

impl Deref for ObjectParam {
    type Target = JsonParam;

    fn deref(&self) -> &JsonParam {
        &self.0
    }
}

impl From<ObjectParam> for JsonParam {
    fn from(node: ObjectParam) -> Self {
        node.0
    }
}

impl From<ObjectParam> for Field {
    fn from(node: ObjectParam) -> Self {
        Field::Nested(node.0)
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<JsonParam>();
    assert_sync::<JsonParam>();
    assert_send::<ObjectParam>();
    assert_sync::<ObjectParam>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Number;
    use serde_json::json;

    fn number() -> RuleChain {
        RuleChain::builder().rule(Number).build().unwrap()
    }

    #[test]
    fn test_node_kinds() {
        assert!(!JsonParam::object().is_sequence());
        assert!(JsonParam::object_list().is_sequence());
        assert!(JsonParam::object().as_list().is_sequence());
        assert!(JsonParam::scalar_list(number()).is_sequence());
        assert!(JsonParam::scalar_list(number()).fields().is_none());
    }

    #[test]
    fn test_fields_keep_declaration_order() {
        let node = JsonParam::object()
            .field("z", number())
            .field("a", number())
            .field("m", JsonParam::object());
        let names: Vec<_> = node.fields().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_required_flags() {
        assert!(JsonParam::object().is_required());
        assert!(!JsonParam::object().optional().is_required());
        assert!(!Field::from(number()).is_required());
        assert!(Field::required(number()).is_required());
        assert!(Field::from(JsonParam::object()).is_required());
    }

    #[test]
    fn test_as_list_keeps_children() {
        let node = JsonParam::object().field("n", number()).as_list().as_list().build();
        assert!(node.is_sequence());
        assert_eq!(node.fields().unwrap().len(), 1);
        let (_, errors) = node.validate(json!([{"n": 1}, {"n": "x"}]));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].item(1).is_some());
    }

    #[test]
    fn test_check_wraps_errors() {
        let node = JsonParam::object().field("n", number());
        assert!(node.check(json!({"n": 1})).is_success());
        match node.check(json!({"n": "x"})) {
            Validation::Failure(errors) => assert_eq!(errors.len(), 1),
            Validation::Success(v) => panic!("expected failure, got {}", v),
        }
    }
}
