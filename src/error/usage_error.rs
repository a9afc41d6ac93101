//! Schema construction errors.

/// A programming mistake in a schema definition.
///
/// Usage errors are raised while schemas are being built, before any request
/// is validated. They cannot be fixed by correcting input data.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// More than one type-coercion rule was placed in the same chain.
    #[error("only one type coercion rule is allowed per chain, got: {}", .rules.join(", "))]
    MultipleCoercions { rules: Vec<&'static str> },

    /// A `Pattern` rule was given a pattern that does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
