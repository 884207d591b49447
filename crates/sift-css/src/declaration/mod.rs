//! Declarations and their normalized slot maps.
//!
//! [CSS Syntax § 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
//!
//! A declaration is normalized exactly once, by the
//! [`DeclarationFactory`], into a map from [`PropertyAndLayer`] slots to the
//! values that fill them. Shorthands additionally own one child declaration
//! per individual property.

mod compare;
mod expand;
mod factory;
mod shorthand;

pub use compare::{DeclarationKey, ValueKey};
pub use factory::DeclarationFactory;
pub use shorthand::{compose_virtual, individuals_match};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::properties::strip_vendor_prefix;
use crate::stylesheet::SelectorId;
use crate::values::{DeclarationValue, PropertyAndLayer, ValueType};

/// Where a declaration starts in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Byte offset.
    pub offset: usize,
}

impl SourceLocation {
    /// A location from its parts.
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// The values filling one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValues {
    /// Position within the slot is significant.
    Ordered(Vec<DeclarationValue>),
    /// The slot compares as a multiset.
    Unordered(Vec<DeclarationValue>),
}

impl SlotValues {
    /// The values in authored order.
    #[must_use]
    pub fn values(&self) -> &[DeclarationValue] {
        match self {
            Self::Ordered(values) | Self::Unordered(values) => values,
        }
    }

    /// Whether position within the slot matters.
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        matches!(self, Self::Ordered(_))
    }

    fn push(&mut self, value: DeclarationValue) {
        match self {
            Self::Ordered(values) | Self::Unordered(values) => values.push(value),
        }
    }
}

/// Slot key to contributing values.
pub type SlotMap = BTreeMap<PropertyAndLayer, SlotValues>;

/// A declaration with several values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiValued {
    values: Vec<DeclarationValue>,
    slots: SlotMap,
}

impl MultiValued {
    /// Group `values` by their assignment. Values without one (separators)
    /// stay in the sequence but fill no slot.
    fn from_values(values: Vec<DeclarationValue>, unordered: impl Fn(&str) -> bool) -> Self {
        let mut slots = SlotMap::new();
        for value in &values {
            if let Some(slot) = value.assignment() {
                slots
                    .entry(slot.clone())
                    .or_insert_with(|| {
                        if unordered(&slot.property) {
                            SlotValues::Unordered(Vec::new())
                        } else {
                            SlotValues::Ordered(Vec::new())
                        }
                    })
                    .push(value.clone());
            }
        }
        Self { values, slots }
    }

    /// Authored and synthesized values in sequence.
    #[must_use]
    pub fn values(&self) -> &[DeclarationValue] {
        &self.values
    }

    /// The slot map.
    #[must_use]
    pub const fn slots(&self) -> &SlotMap {
        &self.slots
    }
}

/// A shorthand with its individual declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shorthand {
    multi: MultiValued,
    individuals: BTreeMap<String, Declaration>,
}

impl Shorthand {
    /// The shorthand's own values and slots.
    #[must_use]
    pub const fn multi(&self) -> &MultiValued {
        &self.multi
    }

    /// Individual property name to child declaration.
    #[must_use]
    pub const fn individuals(&self) -> &BTreeMap<String, Declaration> {
        &self.individuals
    }
}

/// The three shapes a declaration can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    /// Exactly one value.
    Single(DeclarationValue),
    /// Several values, not a shorthand.
    MultiValued(MultiValued),
    /// A shorthand and its decomposition.
    Shorthand(Shorthand),
}

/// A normalized `property: value [!important]` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    property: String,
    important: bool,
    selector: Option<SelectorId>,
    location: SourceLocation,
    is_virtual: bool,
    kind: DeclarationKind,
}

impl Declaration {
    /// The normalized property name, vendor prefix included.
    #[must_use]
    pub fn property(&self) -> &str {
        &self.property
    }

    /// The property name without its vendor prefix.
    #[must_use]
    pub fn unprefixed_property(&self) -> &str {
        strip_vendor_prefix(&self.property)
    }

    /// Whether the declaration is `!important`.
    #[must_use]
    pub const fn is_important(&self) -> bool {
        self.important
    }

    /// The selector the declaration is attached to. Individual declarations
    /// of a shorthand have none; they answer to their shorthand's selector.
    #[must_use]
    pub const fn selector(&self) -> Option<SelectorId> {
        self.selector
    }

    pub(crate) const fn set_selector(&mut self, selector: SelectorId) {
        self.selector = Some(selector);
    }

    /// Where the declaration was written.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }

    /// Whether the declaration was synthesized for comparison rather than
    /// authored.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// The declaration's shape.
    #[must_use]
    pub const fn kind(&self) -> &DeclarationKind {
        &self.kind
    }

    /// Whether this is a shorthand declaration.
    #[must_use]
    pub const fn is_shorthand(&self) -> bool {
        matches!(self.kind, DeclarationKind::Shorthand(_))
    }

    /// Authored and synthesized values in sequence.
    #[must_use]
    pub fn values(&self) -> &[DeclarationValue] {
        match &self.kind {
            DeclarationKind::Single(value) => std::slice::from_ref(value),
            DeclarationKind::MultiValued(multi) => multi.values(),
            DeclarationKind::Shorthand(shorthand) => shorthand.multi.values(),
        }
    }

    /// The slot map. A single value fills the slot it was assigned to.
    #[must_use]
    pub fn slots(&self) -> Cow<'_, SlotMap> {
        match &self.kind {
            DeclarationKind::Single(value) => {
                let key = value
                    .assignment()
                    .cloned()
                    .unwrap_or_else(|| PropertyAndLayer::new(self.unprefixed_property(), 1));
                Cow::Owned(SlotMap::from([(key, SlotValues::Ordered(vec![value.clone()]))]))
            }
            DeclarationKind::MultiValued(multi) => Cow::Borrowed(multi.slots()),
            DeclarationKind::Shorthand(shorthand) => Cow::Borrowed(shorthand.multi.slots()),
        }
    }

    /// The individual declarations of a shorthand.
    #[must_use]
    pub const fn individuals(&self) -> Option<&BTreeMap<String, Self>> {
        match &self.kind {
            DeclarationKind::Shorthand(shorthand) => Some(&shorthand.individuals),
            DeclarationKind::Single(_) | DeclarationKind::MultiValued(_) => None,
        }
    }

    /// One individual declaration of a shorthand, by property name.
    #[must_use]
    pub fn individual(&self, property: &str) -> Option<&Self> {
        self.individuals()?.get(property)
    }

    /// The union of the individual declarations' slot maps.
    ///
    /// For every shorthand this equals [`Declaration::slots`].
    #[must_use]
    pub fn aggregate_individual_slots(&self) -> Option<SlotMap> {
        let individuals = self.individuals()?;
        let mut slots = SlotMap::new();
        for individual in individuals.values() {
            for (key, values) in individual.slots().iter() {
                let _ = slots.insert(key.clone(), values.clone());
            }
        }
        Some(slots)
    }

    /// Literal equality: same property, same `!important` and the same
    /// literal values in every slot, with missing values in the same places.
    #[must_use]
    pub fn declaration_equals(&self, other: &Self) -> bool {
        self.equality_key(false) == other.equality_key(false)
    }

    /// Equivalence: same property, same `!important`, the same slots, and
    /// canonical forms that agree slot by slot.
    #[must_use]
    pub fn declaration_is_equivalent(&self, other: &Self) -> bool {
        self.equivalence_key(false) == other.equivalence_key(false)
    }

    /// A virtual shorthand assembled from existing individual declarations.
    ///
    /// It has no values of its own; its slot map is the union of its
    /// individuals' and it is `!important` only if all of them are.
    #[must_use]
    pub fn virtual_shorthand(
        property: &str,
        individuals: BTreeMap<String, Self>,
        location: SourceLocation,
    ) -> Self {
        let important = !individuals.is_empty() && individuals.values().all(Self::is_important);
        let mut slots = SlotMap::new();
        for individual in individuals.values() {
            for (key, values) in individual.slots().iter() {
                let _ = slots.insert(key.clone(), values.clone());
            }
        }
        Self {
            property: property.to_string(),
            important,
            selector: None,
            location,
            is_virtual: true,
            kind: DeclarationKind::Shorthand(Shorthand {
                multi: MultiValued {
                    values: Vec::new(),
                    slots,
                },
                individuals,
            }),
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.property)?;
        for value in self.values().iter().filter(|v| !v.is_missing()) {
            if value.value_type() == ValueType::Separator {
                write!(f, "{value}")?;
            } else {
                write!(f, " {value}")?;
            }
        }
        match self.individuals() {
            Some(individuals) if self.values().is_empty() => {
                let names: Vec<&str> = individuals.keys().map(String::as_str).collect();
                write!(f, " <{}>", names.join(", "))?;
            }
            _ => {}
        }
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}
