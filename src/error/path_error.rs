//! Path-tagged errors produced by the nested JSON walk.
//!
//! This module provides [`PathError`] for the failures reported at one
//! [`Depth`] of a document and [`PathErrors`] for accumulating them.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::Serialize;
use stillwater::prelude::*;

use super::RuleErrors;
use crate::depth::Depth;

/// The JSON shape a schema node expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Object => write!(f, "object"),
            NodeKind::Array => write!(f, "array"),
        }
    }
}

/// The kind of element a sequence node expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Object,
    Scalar,
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Object => write!(f, "object"),
            ItemKind::Scalar => write!(f, "string, number or boolean"),
        }
    }
}

/// The failure of one element of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemError {
    /// The element has the wrong shape for the sequence.
    InvalidType { expected: ItemKind },
    /// A scalar element failed the sequence's rule chain.
    Rules(RuleErrors),
    /// An object element had failing fields, keyed by field name.
    Fields(IndexMap<String, RuleErrors>),
}

impl Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemError::InvalidType { expected } => write!(f, "invalid item type, expected {}", expected),
            ItemError::Rules(errors) => write!(f, "{}", errors),
            ItemError::Fields(fields) => write_fields(f, fields),
        }
    }
}

/// What went wrong at one depth.
#[derive(Debug, Clone, PartialEq)]
pub enum PathErrorKind {
    /// The value at this depth has the wrong JSON type. Nothing below it was
    /// visited.
    ShapeMismatch { expected: NodeKind },
    /// Failing fields of an object node, keyed by field name in declaration
    /// order.
    Object(IndexMap<String, RuleErrors>),
    /// Failing elements of a sequence node, keyed by index.
    Array(BTreeMap<usize, ItemError>),
}

/// The failures reported by one schema node.
///
/// Nesting is expressed through `depth`, never through containment: a failure
/// three objects deep is its own `PathError` with a four-segment depth, listed
/// next to the errors of its ancestors.
///
/// # Example
///
/// ```rust
/// use indexmap::IndexMap;
/// use reqguard::{Depth, PathError, PathErrorKind, RuleError, RuleErrors};
///
/// let mut fields = IndexMap::new();
/// fields.insert("email".to_string(), RuleErrors::single(RuleError::Email));
///
/// let error = PathError::new(Depth::root().push("user"), PathErrorKind::Object(fields));
///
/// assert!(!error.is_sequence_context());
/// assert_eq!(error.to_string(), "root|user: email: invalid email address");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PathError {
    /// Where the failing node sits in the document.
    pub depth: Depth,
    /// What failed at that node.
    pub kind: PathErrorKind,
}

impl PathError {
    /// Creates a new path error.
    pub fn new(depth: Depth, kind: PathErrorKind) -> Self {
        Self { depth, kind }
    }

    pub(crate) fn shape(depth: Depth, expected: NodeKind) -> Self {
        Self::new(depth, PathErrorKind::ShapeMismatch { expected })
    }

    /// Returns true if the error keys are array indices.
    pub fn is_sequence_context(&self) -> bool {
        matches!(self.kind, PathErrorKind::Array(_))
    }

    /// Returns true if the node had the wrong JSON type.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self.kind, PathErrorKind::ShapeMismatch { .. })
    }

    /// Returns the failures of a named field, if this is an object error.
    pub fn field(&self, name: &str) -> Option<&RuleErrors> {
        match &self.kind {
            PathErrorKind::Object(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Returns the failure of a sequence element, if this is an array error.
    pub fn item(&self, index: usize) -> Option<&ItemError> {
        match &self.kind {
            PathErrorKind::Array(items) => items.get(&index),
            _ => None,
        }
    }

    /// Returns the number of failing keys or indices (1 for a shape mismatch).
    pub fn len(&self) -> usize {
        match &self.kind {
            PathErrorKind::ShapeMismatch { .. } => 1,
            PathErrorKind::Object(fields) => fields.len(),
            PathErrorKind::Array(items) => items.len(),
        }
    }

    /// Always false: a path error is only created for a failure.
    pub fn is_empty(&self) -> bool {
        false
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &IndexMap<String, RuleErrors>) -> fmt::Result {
    let parts: Vec<String> = fields
        .iter()
        .map(|(name, errors)| format!("{}: {}", name, errors))
        .collect();
    write!(f, "{}", parts.join("; "))
}

impl Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.depth)?;
        match &self.kind {
            PathErrorKind::ShapeMismatch { expected } => write!(f, "expected {}", expected),
            PathErrorKind::Object(fields) => write_fields(f, fields),
            PathErrorKind::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|(index, error)| format!("[{}] {}", index, error))
                    .collect();
                write!(f, "{}", parts.join("; "))
            }
        }
    }
}

impl std::error::Error for PathError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<PathError>();
    assert_sync::<PathError>();
};

/// A non-empty collection of path errors.
///
/// `PathErrors` is the failure side of [`JsonParam::check`](crate::JsonParam::check)
/// and keeps errors in the order the walk produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct PathErrors(NonEmptyVec<PathError>);

impl PathErrors {
    /// Creates a `PathErrors` containing a single error.
    pub fn single(error: PathError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `PathErrors` from a vec, or None if the vec is empty.
    pub fn from_vec(errors: Vec<PathError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = errors.next()?;
        Some(errors.fold(Self::single(head), |acc, e| acc.combine(Self::single(e))))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &PathError> {
        self.0.iter()
    }

    /// Returns all errors reported at the given depth.
    pub fn at_depth(&self, depth: &Depth) -> Vec<&PathError> {
        self.0.iter().filter(|e| &e.depth == depth).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &PathError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<PathError>`.
    pub fn into_vec(self) -> Vec<PathError> {
        self.0.into_vec()
    }
}

impl Semigroup for PathErrors {
    fn combine(self, other: Self) -> Self {
        PathErrors(self.0.combine(other.0))
    }
}

impl Display for PathErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len() == 1 {
            write!(f, "{}", self.first())
        } else {
            writeln!(f, "{} validation errors:", self.len())?;
            for (i, error) in self.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, error)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for PathErrors {}

impl From<PathError> for PathErrors {
    fn from(error: PathError) -> Self {
        PathErrors::single(error)
    }
}

impl IntoIterator for PathErrors {
    type Item = PathError;
    type IntoIter = std::vec::IntoIter<PathError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}
