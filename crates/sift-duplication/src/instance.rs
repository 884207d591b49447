//! Duplication instances reported by the detector.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sift_css::{DeclarationId, SelectorId};
use strum_macros::{Display, EnumIter, EnumString};

/// The class of redundancy an instance belongs to.
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
pub enum DuplicationKind {
    /// Type I: literally equal declarations.
    #[strum(serialize = "I")]
    IdenticalDeclarations,
    /// Type II: equivalent declarations that are not literally equal.
    #[strum(serialize = "II")]
    EquivalentDeclarations,
    /// Type III: a shorthand duplicating another rule's longhands.
    #[strum(serialize = "III")]
    ShorthandDeclarations,
    /// Type IV-A: structurally equal selectors.
    #[strum(serialize = "IV-A")]
    IdenticalSelectors,
    /// Type IV-B: selectors matching the same elements of a document.
    #[strum(serialize = "IV-B")]
    EquivalentSelectors,
}

impl DuplicationKind {
    /// Whether the kind is about declarations, and so feeds items.
    #[must_use]
    pub const fn is_declaration_level(self) -> bool {
        matches!(
            self,
            Self::IdenticalDeclarations | Self::EquivalentDeclarations | Self::ShorthandDeclarations
        )
    }
}

/// A declaration taking part in an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclarationRef {
    /// A declaration written in the stylesheet.
    Authored(DeclarationId),
    /// A shorthand composed from a selector's longhands during analysis.
    Virtual {
        /// The selector holding the longhands.
        selector: SelectorId,
        /// The composed shorthand.
        declaration: DeclarationId,
    },
}

impl DeclarationRef {
    /// The arena index of the declaration.
    #[must_use]
    pub const fn id(self) -> DeclarationId {
        match self {
            Self::Authored(id) | Self::Virtual { declaration: id, .. } => id,
        }
    }
}

/// One group of redundant declarations or selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationInstance {
    /// Which pass found it.
    pub kind: DuplicationKind,
    /// Every selector involved.
    pub selectors: BTreeSet<SelectorId>,
    /// The declarations involved in discovery order; empty for selector
    /// duplication.
    pub declarations: Vec<DeclarationRef>,
}

impl DuplicationInstance {
    /// An instance over `selectors` with no declarations.
    #[must_use]
    pub const fn of_selectors(kind: DuplicationKind, selectors: BTreeSet<SelectorId>) -> Self {
        Self {
            kind,
            selectors,
            declarations: Vec::new(),
        }
    }

    /// Whether `a` and `b` both take part.
    #[must_use]
    pub fn links(&self, a: SelectorId, b: SelectorId) -> bool {
        self.selectors.contains(&a) && self.selectors.contains(&b)
    }
}

/// The instances found by one pass, in discovery order.
pub type DuplicationIncidents = Vec<DuplicationInstance>;
