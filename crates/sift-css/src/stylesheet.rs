//! Arena of selectors and declarations built from one stylesheet.
//!
//! Selectors and declarations live in owning vectors; the links between
//! them are [`SelectorId`] and [`DeclarationId`] indices. A shorthand's
//! individual declarations are owned by the shorthand and answer to its
//! selector.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::declaration::{Declaration, SourceLocation};
use crate::selector::{ComplexSelector, SelectorKey, UnsupportedSelectorError};

/// Index of a [`SelectorEntry`] in its [`StyleSheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectorId(pub usize);

/// Index of a [`Declaration`] in its [`StyleSheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclarationId(pub usize);

/// The `@media` preludes enclosing a rule, outermost first, each
/// lower-cased with whitespace collapsed. Empty outside any `@media`.
pub type MediaQueryList = Vec<String>;

/// [Selectors § 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorKind {
    /// A single complex selector.
    Base(ComplexSelector),
    /// A comma-separated list sharing one declaration block.
    Grouping(Vec<ComplexSelector>),
}

/// A rule's selector together with what the rule contains.
#[derive(Debug, Clone)]
pub struct SelectorEntry {
    text: String,
    kind: SelectorKind,
    media: MediaQueryList,
    location: SourceLocation,
    declarations: Vec<DeclarationId>,
    virtual_declarations: Vec<DeclarationId>,
}

/// What selector equality compares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorEntryKey {
    /// Base selectors as a set.
    pub selectors: BTreeSet<SelectorKey>,
    /// The media context, when it is considered.
    pub media: Option<MediaQueryList>,
}

impl SelectorEntry {
    /// A selector with no declarations yet.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        kind: SelectorKind,
        media: MediaQueryList,
        location: SourceLocation,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            media,
            location,
            declarations: Vec::new(),
            virtual_declarations: Vec::new(),
        }
    }

    /// The selector as written, trimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Base or grouping.
    #[must_use]
    pub const fn kind(&self) -> &SelectorKind {
        &self.kind
    }

    /// Whether this is a comma-separated list.
    #[must_use]
    pub const fn is_grouping(&self) -> bool {
        matches!(self.kind, SelectorKind::Grouping(_))
    }

    /// The complex selectors: one for a base selector, each member for a
    /// grouping.
    #[must_use]
    pub fn base_selectors(&self) -> &[ComplexSelector] {
        match &self.kind {
            SelectorKind::Base(selector) => std::slice::from_ref(selector),
            SelectorKind::Grouping(selectors) => selectors,
        }
    }

    /// The enclosing media context.
    #[must_use]
    pub fn media(&self) -> &MediaQueryList {
        &self.media
    }

    /// Where the rule starts.
    #[must_use]
    pub const fn location(&self) -> SourceLocation {
        self.location
    }

    /// Authored declarations in source order.
    #[must_use]
    pub fn declarations(&self) -> &[DeclarationId] {
        &self.declarations
    }

    /// Virtual shorthands attached during analysis.
    #[must_use]
    pub fn virtual_declarations(&self) -> &[DeclarationId] {
        &self.virtual_declarations
    }

    /// The key [`SelectorEntry::selector_equals`] compares.
    #[must_use]
    pub fn equality_key(&self, consider_media: bool) -> SelectorEntryKey {
        SelectorEntryKey {
            selectors: self
                .base_selectors()
                .iter()
                .map(ComplexSelector::structural_key)
                .collect(),
            media: consider_media.then(|| self.media.clone()),
        }
    }

    /// Base selectors equal structurally, groupings equal as sets of base
    /// selectors; with `consider_media` the media contexts must match too.
    #[must_use]
    pub fn selector_equals(&self, other: &Self, consider_media: bool) -> bool {
        self.equality_key(consider_media) == other.equality_key(consider_media)
    }

    /// XPath selecting every element this selector matches; a grouping
    /// becomes a union.
    ///
    /// # Errors
    ///
    /// [`UnsupportedSelectorError`] if any member has no XPath equivalent.
    pub fn to_xpath(&self) -> Result<String, UnsupportedSelectorError> {
        let paths = self
            .base_selectors()
            .iter()
            .map(ComplexSelector::to_xpath)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(paths.join(" | "))
    }
}

/// Selectors and declarations of one stylesheet.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    selectors: Vec<SelectorEntry>,
    declarations: Vec<Declaration>,
}

impl StyleSheet {
    /// An empty stylesheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a selector; it comes after every selector added before.
    pub fn add_selector(&mut self, entry: SelectorEntry) -> SelectorId {
        let id = SelectorId(self.selectors.len());
        self.selectors.push(entry);
        id
    }

    /// Attach an authored declaration to `selector`.
    ///
    /// # Panics
    ///
    /// If `selector` does not belong to this stylesheet.
    pub fn add_declaration(
        &mut self,
        selector: SelectorId,
        declaration: Declaration,
    ) -> DeclarationId {
        let id = self.push(selector, declaration);
        self.selectors[selector.0].declarations.push(id);
        id
    }

    /// Attach a virtual shorthand synthesized during analysis. It is not
    /// listed among the authored declarations.
    ///
    /// # Panics
    ///
    /// If `selector` does not belong to this stylesheet.
    pub fn attach_virtual(
        &mut self,
        selector: SelectorId,
        declaration: Declaration,
    ) -> DeclarationId {
        let id = self.push(selector, declaration);
        self.selectors[selector.0].virtual_declarations.push(id);
        id
    }

    fn push(&mut self, selector: SelectorId, mut declaration: Declaration) -> DeclarationId {
        declaration.set_selector(selector);
        let id = DeclarationId(self.declarations.len());
        self.declarations.push(declaration);
        id
    }

    /// Number of selectors.
    #[must_use]
    pub fn selector_count(&self) -> usize {
        self.selectors.len()
    }

    /// Every selector in document order.
    pub fn all_selectors(&self) -> impl Iterator<Item = (SelectorId, &SelectorEntry)> + '_ {
        self.selectors
            .iter()
            .enumerate()
            .map(|(index, entry)| (SelectorId(index), entry))
    }

    /// Every selector that is not a grouping.
    pub fn all_base_selectors(&self) -> impl Iterator<Item = (SelectorId, &ComplexSelector)> + '_ {
        self.all_selectors().filter_map(|(id, entry)| match &entry.kind {
            SelectorKind::Base(selector) => Some((id, selector)),
            SelectorKind::Grouping(_) => None,
        })
    }

    /// Every authored declaration in document order.
    pub fn all_declarations(&self) -> impl Iterator<Item = (DeclarationId, &Declaration)> + '_ {
        self.selectors.iter().flat_map(move |entry| {
            entry
                .declarations
                .iter()
                .map(move |&id| (id, &self.declarations[id.0]))
        })
    }

    /// The authored declarations of `selector`.
    pub fn declarations_of(
        &self,
        selector: SelectorId,
    ) -> impl Iterator<Item = (DeclarationId, &Declaration)> + '_ {
        self.selector(selector)
            .map(SelectorEntry::declarations)
            .unwrap_or_default()
            .iter()
            .map(move |&id| (id, &self.declarations[id.0]))
    }

    /// A selector by id.
    #[must_use]
    pub fn selector(&self, id: SelectorId) -> Option<&SelectorEntry> {
        self.selectors.get(id.0)
    }

    /// A declaration by id, authored or virtual.
    #[must_use]
    pub fn declaration(&self, id: DeclarationId) -> Option<&Declaration> {
        self.declarations.get(id.0)
    }

    /// The media context of `selector`; empty for an unknown id.
    #[must_use]
    pub fn media_of(&self, selector: SelectorId) -> &[String] {
        self.selector(selector).map_or(&[], |entry| entry.media.as_slice())
    }

    /// The media context a declaration is evaluated in.
    #[must_use]
    pub fn media_of_declaration(&self, declaration: &Declaration) -> &[String] {
        declaration
            .selector()
            .map_or(&[], |selector| self.media_of(selector))
    }

    /// Literal equality within the same media context.
    #[must_use]
    pub fn declarations_equal(&self, a: DeclarationId, b: DeclarationId) -> bool {
        self.compare(a, b, Declaration::declaration_equals)
    }

    /// Equivalence within the same media context.
    #[must_use]
    pub fn declarations_equivalent(&self, a: DeclarationId, b: DeclarationId) -> bool {
        self.compare(a, b, Declaration::declaration_is_equivalent)
    }

    fn compare(
        &self,
        a: DeclarationId,
        b: DeclarationId,
        predicate: impl Fn(&Declaration, &Declaration) -> bool,
    ) -> bool {
        match (self.declaration(a), self.declaration(b)) {
            (Some(x), Some(y)) => {
                self.media_of_declaration(x) == self.media_of_declaration(y) && predicate(x, y)
            }
            _ => false,
        }
    }
}
