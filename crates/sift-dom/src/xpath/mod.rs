//! [XPath 1.0](https://www.w3.org/TR/1999/REC-xpath-19991116/) over [`DomTree`].
//!
//! Supports the subset of the language that selector translation produces:
//! location paths on the `child`, `descendant`, `descendant-or-self`,
//! `parent`, `ancestor`, `ancestor-or-self`, `following-sibling`,
//! `preceding-sibling`, `self` and `attribute` axes, predicates, the
//! boolean/arithmetic/comparison operators and the core string, number and
//! node-set functions.

mod ast;
mod eval;
mod lexer;
mod parser;

pub use ast::{Axis, BinaryOp, Expr, LocationPath, NodeTest, Step};

use crate::{DomTree, NodeId};

/// Failure to compile or evaluate an XPath expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XPathError {
    /// The expression is not well formed.
    #[error("bad XPath at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the expression.
        offset: usize,
        /// What went wrong.
        message: String,
    },
    /// A function the engine does not implement was called.
    #[error("unsupported XPath function {0}()")]
    UnsupportedFunction(String),
    /// A function was called with the wrong number of arguments.
    #[error("wrong number of arguments to {0}()")]
    Arity(String),
    /// The expression evaluated to something other than a node-set.
    #[error("XPath expression does not evaluate to a node-set")]
    NotANodeSet,
}

/// A document that can answer XPath queries.
///
/// This is the seam between selector analysis and whatever engine holds the
/// page being analysed.
pub trait QueryDocument {
    /// Evaluate `xpath` with the document node as context and return the
    /// selected elements in document order.
    ///
    /// # Errors
    /// Returns an [`XPathError`] if the expression is malformed, calls an
    /// unknown function, or does not yield a node-set.
    fn query(&self, xpath: &str) -> Result<Vec<NodeId>, XPathError>;
}

impl QueryDocument for DomTree {
    fn query(&self, xpath: &str) -> Result<Vec<NodeId>, XPathError> {
        query_document(self, xpath)
    }
}

/// Compile and evaluate `xpath` against `tree`.
///
/// # Errors
/// See [`QueryDocument::query`].
pub fn query_document(tree: &DomTree, xpath: &str) -> Result<Vec<NodeId>, XPathError> {
    let expr = compile(xpath)?;
    eval::Evaluator::new(tree).select_elements(&expr)
}

/// Parse an expression without evaluating it.
///
/// # Errors
/// Returns [`XPathError::Syntax`] for malformed input.
pub fn compile(xpath: &str) -> Result<Expr, XPathError> {
    let tokens = lexer::tokenize(xpath)?;
    parser::Parser::new(tokens).parse()
}
