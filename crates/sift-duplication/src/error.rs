//! Errors raised by duplication analysis.

use sift_css::{CssError, SelectorId, UnsupportedSelectorError};
use sift_dom::XPathError;
use thiserror::Error;

/// Failure of an analysis run, or of one selector's document query.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The stylesheet could not be built.
    #[error(transparent)]
    Css(#[from] CssError),
    /// JSON that does not fit [`AnalysisOptions`](crate::AnalysisOptions),
    /// or a report that failed to serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The options parse but cannot be used.
    #[error("invalid analysis options: {reason}")]
    InvalidOptions {
        /// What is wrong with them.
        reason: String,
    },
    /// A selector has no XPath equivalent.
    #[error(transparent)]
    UnsupportedSelector(#[from] UnsupportedSelectorError),
    /// The document rejected a query.
    #[error(transparent)]
    Query(#[from] XPathError),
    /// A document query was requested without a bound document.
    #[error("no document is bound to the detector")]
    NoDocument,
    /// The selector id does not belong to the analysed stylesheet.
    #[error("unknown selector #{}", .0.0)]
    UnknownSelector(SelectorId),
}
