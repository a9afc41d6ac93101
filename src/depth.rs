//! Document depth tracking for nested JSON validation.
//!
//! This module provides [`Depth`], the ordered list of field names leading
//! from the document root to the node where a [`PathError`](crate::PathError)
//! was raised.

use std::fmt::{self, Display};

/// Name of the first segment of every depth.
pub const ROOT: &str = "root";

/// The location of a schema node inside a JSON document.
///
/// A depth always starts with `"root"` and grows by one field name per nested
/// object or array node. Array indices are never part of a depth; they appear
/// as keys inside the array-context error reported at that depth.
///
/// # Example
///
/// ```rust
/// use reqguard::Depth;
///
/// let depth = Depth::root().push("person").push("contacts");
///
/// assert_eq!(depth.to_string(), "root|person|contacts");
/// assert_eq!(depth, ["root", "person", "contacts"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Depth {
    segments: Vec<String>,
}

impl Depth {
    /// Creates the depth of the document root.
    pub fn root() -> Self {
        Self {
            segments: vec![ROOT.to_string()],
        }
    }

    /// Returns a new depth with a field name appended.
    ///
    /// This method does not modify the original depth; it returns a new one.
    pub fn push(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Returns true if this is the document root.
    pub fn is_root(&self) -> bool {
        self.segments.len() == 1
    }

    /// Returns the number of segments, including `"root"`.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a depth holds at least the root segment.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Returns the segments as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.segments
    }

    /// Returns the parent depth, or None for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment (the field name of the node).
    pub fn last(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or(ROOT)
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::root()
    }
}

impl Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("|"))
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Depth {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.segments.len() == N && self.segments.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl PartialEq<Vec<&str>> for Depth {
    fn eq(&self, other: &Vec<&str>) -> bool {
        self.segments.len() == other.len()
            && self.segments.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}
