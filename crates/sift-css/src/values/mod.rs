//! Typed declaration values per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
//!
//! A [`DeclarationValue`] keeps the token exactly as authored (its literal) and,
//! when the value has an interchangeable spelling, a canonical form used for
//! equivalence. `center` in a position is authored as `center` but compares as
//! `50%`; `#F00` compares as `#ff0000`.

mod canonical;
mod classify;

pub use canonical::{canonical_color, canonicalize, named_color};
pub use classify::{LENGTH_UNITS, TIME_UNITS, classify_dimension, classify_ident, is_color_function};

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// [§ 4 Textual Data Types](https://www.w3.org/TR/css-values-4/#textual-values)
/// and the types that follow it.
///
/// The kind of token a value was written as.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    /// `<length>`, e.g. `10px`, `1.5em`.
    Length,
    /// `<percentage>`, e.g. `50%`.
    Percentage,
    /// `<color>`: hex, named colors, `rgb()` and friends.
    Color,
    /// Any other identifier, e.g. `solid`, `inherit`.
    Ident,
    /// A quoted string.
    String,
    /// `url(...)`.
    Url,
    /// `<integer>`, e.g. `400`, `0`.
    Integer,
    /// `<number>` with a fractional part, e.g. `1.5`.
    Number,
    /// `<time>`, e.g. `200ms`, `1s`.
    Time,
    /// Any function that is not a color or url, e.g. `cubic-bezier(...)`.
    Function,
    /// The `/` operator between values.
    Operator,
    /// The `,` separating layers or list entries.
    Separator,
    /// Everything else (angles, resolutions, `fr`, unknown delimiters).
    Other,
}

impl ValueType {
    /// Whether literal comparison of this type ignores ASCII case.
    #[must_use]
    pub const fn is_case_insensitive(self) -> bool {
        !matches!(self, Self::String | Self::Url)
    }
}

/// The longhand slot a value has been assigned to.
///
/// `layer` is 1 for non-layered properties and counts comma-separated layers
/// for properties such as `background`, `box-shadow` and `transition`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyAndLayer {
    /// The (unprefixed) longhand or axis name.
    pub property: String,
    /// 1-based layer index.
    pub layer: u32,
}

impl PropertyAndLayer {
    /// Create a slot key.
    #[must_use]
    pub fn new(property: impl Into<String>, layer: u32) -> Self {
        Self {
            property: property.into(),
            layer,
        }
    }
}

impl fmt::Display for PropertyAndLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.property, self.layer)
    }
}

/// Whether a value carries a separate canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// The literal is the canonical form.
    Plain,
    /// The value is interchangeable with `canonical`.
    Equivalent {
        /// The canonical spelling.
        canonical: String,
    },
}

/// A single CSS value inside a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationValue {
    literal: String,
    value_type: ValueType,
    kind: ValueKind,
    missing: bool,
    assignment: Option<PropertyAndLayer>,
}

impl DeclarationValue {
    /// An authored value with no separate canonical form.
    #[must_use]
    pub fn new(literal: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            literal: literal.into(),
            value_type,
            kind: ValueKind::Plain,
            missing: false,
            assignment: None,
        }
    }

    /// An authored value that compares as `canonical` for equivalence.
    #[must_use]
    pub fn equivalent(
        literal: impl Into<String>,
        value_type: ValueType,
        canonical: impl Into<String>,
    ) -> Self {
        Self::new(literal, value_type).with_canonical(canonical)
    }

    /// A value synthesized from a property's initial value.
    #[must_use]
    pub fn synthesized(literal: &str, value_type: ValueType) -> Self {
        let mut value = canonicalize(Self::new(literal, value_type));
        value.missing = true;
        value
    }

    /// Replace the canonical form. A canonical equal to the literal leaves
    /// the value plain.
    #[must_use]
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        self.kind = if canonical == self.comparable_literal() {
            ValueKind::Plain
        } else {
            ValueKind::Equivalent { canonical }
        };
        self
    }

    /// A missing copy of this value, used when a shorthand repeats an
    /// authored value into slots the author left out.
    #[must_use]
    pub fn clone_as_missing(&self) -> Self {
        Self {
            missing: true,
            assignment: None,
            ..self.clone()
        }
    }

    /// The text as authored.
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The token type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the value has a canonical form distinct from its literal.
    #[must_use]
    pub const fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// True iff the value was synthesized rather than authored.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        self.missing
    }

    /// The slot this value was classified into, if any.
    #[must_use]
    pub const fn assignment(&self) -> Option<&PropertyAndLayer> {
        self.assignment.as_ref()
    }

    pub(crate) fn assign(&mut self, slot: PropertyAndLayer) {
        self.assignment = Some(slot);
    }

    /// The literal normalized for case-insensitive comparison.
    #[must_use]
    pub fn comparable_literal(&self) -> String {
        if self.value_type.is_case_insensitive() {
            self.literal.to_ascii_lowercase()
        } else {
            self.literal.clone()
        }
    }

    /// The form used for equivalence comparisons.
    #[must_use]
    pub fn canonical(&self) -> String {
        match &self.kind {
            ValueKind::Plain => self.comparable_literal(),
            ValueKind::Equivalent { canonical } => canonical.clone(),
        }
    }

    /// Case-insensitive identifier check.
    #[must_use]
    pub fn is_ident(&self, keyword: &str) -> bool {
        self.value_type == ValueType::Ident && self.literal.eq_ignore_ascii_case(keyword)
    }

    /// Whether the value is a lowercase identifier contained in `table`.
    #[must_use]
    pub fn is_ident_in(&self, table: &[&str]) -> bool {
        self.value_type == ValueType::Ident
            && table.contains(&self.literal.to_ascii_lowercase().as_str())
    }

    /// `<length>` or a unitless zero, which CSS accepts wherever a length is.
    #[must_use]
    pub fn is_length_like(&self) -> bool {
        match self.value_type {
            ValueType::Length => true,
            ValueType::Integer | ValueType::Number => {
                self.literal.trim_start_matches(['+', '-']).chars().all(|c| c == '0' || c == '.')
            }
            _ => false,
        }
    }

    /// Literal equality: same type and same (case-normalized) literal.
    #[must_use]
    pub fn literal_eq(&self, other: &Self) -> bool {
        self.value_type == other.value_type && self.comparable_literal() == other.comparable_literal()
    }

    /// Equivalence: same canonical form.
    #[must_use]
    pub fn equivalent_to(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl fmt::Display for DeclarationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}
