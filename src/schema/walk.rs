//! The recursive document walk.
//!
//! Each node checks the shape of its value, validates its children, and
//! returns the converted value together with the errors of its whole subtree.
//! Errors of nested nodes come first, followed by the node's own error.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use super::param::{Field, JsonParam, Shape};
use crate::depth::Depth;
use crate::error::{ItemError, ItemKind, NodeKind, PathError, PathErrorKind, RuleError, RuleErrors};
use crate::rules::RuleChain;

/// Failures found while validating one object value.
struct ObjectOutcome {
    /// Failures of this object's own keys.
    fields: IndexMap<String, RuleErrors>,
    /// Errors reported by nested nodes below this object.
    nested: Vec<PathError>,
}

impl JsonParam {
    pub(super) fn walk(&self, value: Value, depth: &Depth) -> (Value, Vec<PathError>) {
        tracing::trace!(depth = %depth, sequence = self.is_sequence(), "validating json node");

        match (&self.shape, value) {
            (Shape::Object(fields), Value::Object(map)) => {
                let (map, outcome) = walk_object(fields, map, depth);
                let mut errors = outcome.nested;
                if !outcome.fields.is_empty() {
                    errors.push(PathError::new(depth.clone(), PathErrorKind::Object(outcome.fields)));
                }
                (Value::Object(map), errors)
            }
            (Shape::ObjectList(fields), Value::Array(items)) => walk_object_list(fields, items, depth),
            (Shape::ScalarList(rules), Value::Array(items)) => walk_scalar_list(rules, items, depth),
            (Shape::Object(_), other) => (other, vec![PathError::shape(depth.clone(), NodeKind::Object)]),
            (Shape::ObjectList(_) | Shape::ScalarList(_), other) => {
                (other, vec![PathError::shape(depth.clone(), NodeKind::Array)])
            }
        }
    }
}

fn missing(name: &str) -> RuleErrors {
    RuleErrors::single(RuleError::MissingKey {
        key: name.to_string(),
    })
}

fn walk_object(
    fields: &IndexMap<String, Field>,
    mut map: Map<String, Value>,
    depth: &Depth,
) -> (Map<String, Value>, ObjectOutcome) {
    let mut outcome = ObjectOutcome {
        fields: IndexMap::new(),
        nested: Vec::new(),
    };

    for (name, field) in fields {
        let Some(slot) = map.get_mut(name) else {
            if field.is_required() {
                outcome.fields.insert(name.clone(), missing(name));
            }
            continue;
        };

        match field {
            Field::Leaf { rules, .. } => match rules.validate(slot) {
                Validation::Success(converted) => *slot = converted,
                Validation::Failure(errors) => {
                    outcome.fields.insert(name.clone(), errors);
                }
            },
            Field::Nested(node) => {
                if slot.is_null() && !node.is_required() {
                    continue;
                }
                let (converted, errors) = node.walk(std::mem::take(slot), &depth.push(name.as_str()));
                *slot = converted;
                outcome.nested.extend(errors);
            }
        }
    }

    (map, outcome)
}

fn walk_object_list(
    fields: &IndexMap<String, Field>,
    mut items: Vec<Value>,
    depth: &Depth,
) -> (Value, Vec<PathError>) {
    let mut item_errors = BTreeMap::new();
    let mut errors = Vec::new();

    for (index, item) in items.iter_mut().enumerate() {
        match std::mem::take(item) {
            Value::Object(map) => {
                let (map, outcome) = walk_object(fields, map, depth);
                errors.extend(outcome.nested);
                if !outcome.fields.is_empty() {
                    item_errors.insert(index, ItemError::Fields(outcome.fields));
                }
                *item = Value::Object(map);
            }
            other => {
                item_errors.insert(
                    index,
                    ItemError::InvalidType {
                        expected: ItemKind::Object,
                    },
                );
                *item = other;
            }
        }
    }

    if !item_errors.is_empty() {
        errors.push(PathError::new(depth.clone(), PathErrorKind::Array(item_errors)));
    }
    (Value::Array(items), errors)
}

fn walk_scalar_list(rules: &RuleChain, mut items: Vec<Value>, depth: &Depth) -> (Value, Vec<PathError>) {
    let mut item_errors = BTreeMap::new();

    for (index, item) in items.iter_mut().enumerate() {
        if item.is_object() || item.is_array() {
            item_errors.insert(
                index,
                ItemError::InvalidType {
                    expected: ItemKind::Scalar,
                },
            );
            continue;
        }
        match rules.validate(item) {
            Validation::Success(converted) => *item = converted,
            Validation::Failure(errors) => {
                item_errors.insert(index, ItemError::Rules(errors));
            }
        }
    }

    let errors = if item_errors.is_empty() {
        Vec::new()
    } else {
        vec![PathError::new(depth.clone(), PathErrorKind::Array(item_errors))]
    };
    (Value::Array(items), errors)
}
