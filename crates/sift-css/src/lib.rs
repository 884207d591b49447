//! CSS model for duplication analysis: typed values, normalized declarations,
//! selectors, and the stylesheet arena that holds them.
//!
//! # Scope
//!
//! This crate implements:
//! - **Values** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Typed tokens with an authored literal and a canonical form
//!   - Colors, zero lengths, times and position keywords canonicalized
//!
//! - **Declarations**
//!   - Shorthand and multi-valued properties expanded into per-slot maps
//!   - Omitted values synthesized from initial values and flagged missing
//!   - Literal equality and canonical equivalence as key comparisons
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal, attribute and pseudo selectors
//!   - Structural equality and XPath 1.0 translation
//!
//! - **Front end** ([CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/))
//!   - Tokenizer with source spans
//!   - Style rules and `@media` blocks into a [`StyleSheet`]
//!
//! # Not Yet Implemented
//!
//! - `@supports`, `@layer` and nested style rules (skipped)
//! - Namespaced selectors

/// Declarations and their normalization.
pub mod declaration;
/// Error types.
pub mod error;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Shorthand, multi-valued and initial-value tables.
pub mod properties;
/// CSS selectors per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Selector and declaration arena.
pub mod stylesheet;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// Typed declaration values.
pub mod values;

pub use declaration::{
    Declaration, DeclarationFactory, DeclarationKey, DeclarationKind, SlotMap, SlotValues,
    SourceLocation,
};
pub use error::{CssError, DeclarationError};
pub use parser::{parse_stylesheet, parse_stylesheet_with};
pub use properties::{PropertyFamily, PropertyTables};
pub use selector::{ComplexSelector, UnsupportedSelectorError};
pub use stylesheet::{
    DeclarationId, MediaQueryList, SelectorEntry, SelectorId, SelectorKind, StyleSheet,
};
pub use values::{DeclarationValue, PropertyAndLayer, ValueKind, ValueType};
