//! Errors raised while building the stylesheet model.

use thiserror::Error;

/// Failure to normalize a declaration's values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A property that takes pairs of values was given an odd number.
    #[error("'{property}' takes pairs of values, got {count}")]
    OddArity {
        /// The property name.
        property: String,
        /// The number of values given.
        count: usize,
    },
    /// The property is registered as shorthand or multi-valued but nothing
    /// knows how to expand it.
    #[error("no expansion is implemented for '{property}'")]
    NotImplemented {
        /// The property name.
        property: String,
    },
    /// The declaration has no values.
    #[error("'{property}' has no value")]
    Empty {
        /// The property name.
        property: String,
    },
    /// The values do not fit the property's grammar.
    #[error("invalid value for '{property}': {reason}")]
    InvalidValue {
        /// The property name.
        property: String,
        /// What did not fit.
        reason: String,
    },
}

impl DeclarationError {
    pub(crate) fn invalid(property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            property: property.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error must abort stylesheet construction.
    ///
    /// Values that merely do not parse are dropped the way a browser drops
    /// them; arity violations and missing handlers are not.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::OddArity { .. } | Self::NotImplemented { .. })
    }
}

/// Failure to build a [`StyleSheet`](crate::StyleSheet) from CSS text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    /// The text is not well-formed enough to recover.
    #[error("{line}:{column}: {message}")]
    Parse {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// What went wrong.
        message: String,
    },
    /// A declaration could not be normalized.
    #[error("{line}:{column}: {source}")]
    Declaration {
        /// 1-based line of the declaration.
        line: usize,
        /// 1-based column of the declaration.
        column: usize,
        /// The normalization failure.
        #[source]
        source: DeclarationError,
    },
}
