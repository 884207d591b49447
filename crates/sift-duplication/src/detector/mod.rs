//! The duplication detector: one batch pass per duplication kind over a
//! built [`StyleSheet`].
//!
//! Passes run on demand and cache their instances; a later call returns
//! the cached list. Type III is the only pass that changes the stylesheet:
//! it attaches the virtual shorthands it matched to their selectors.

mod declarations;
mod selectors;

use sift_css::{PropertyTables, SelectorId, StyleSheet};
use sift_dom::{NodeId, QueryDocument};
use tracing::{debug, info_span};

use crate::error::AnalysisError;
use crate::instance::{DuplicationIncidents, DuplicationInstance, DuplicationKind};
use crate::items::ItemRegistry;
use crate::miner::{FrequentItemset, ItemsetMiner};
use crate::options::AnalysisOptions;
use crate::report::DuplicationReport;

/// Finds redundant declarations and selectors in one stylesheet.
pub struct DuplicationDetector<'a> {
    sheet: &'a mut StyleSheet,
    tables: &'a PropertyTables,
    options: AnalysisOptions,
    document: Option<&'a dyn QueryDocument>,
    identical_declarations: Option<DuplicationIncidents>,
    equivalent_declarations: Option<DuplicationIncidents>,
    shorthand_declarations: Option<DuplicationIncidents>,
    identical_selectors: Option<DuplicationIncidents>,
    equivalent_selectors: Option<DuplicationIncidents>,
    items: ItemRegistry,
}

impl<'a> DuplicationDetector<'a> {
    /// A detector over `sheet` using the standard property tables.
    #[must_use]
    pub fn new(sheet: &'a mut StyleSheet, options: AnalysisOptions) -> Self {
        Self {
            sheet,
            tables: PropertyTables::standard(),
            options,
            document: None,
            identical_declarations: None,
            equivalent_declarations: None,
            shorthand_declarations: None,
            identical_selectors: None,
            equivalent_selectors: None,
            items: ItemRegistry::new(),
        }
    }

    /// Compose virtual shorthands with `tables` instead of the standard
    /// ones. Use the tables the stylesheet was normalized with.
    #[must_use]
    pub const fn with_tables(mut self, tables: &'a PropertyTables) -> Self {
        self.tables = tables;
        self
    }

    /// Bind the document Type IV-B evaluates selectors against.
    #[must_use]
    pub fn with_document(mut self, document: &'a dyn QueryDocument) -> Self {
        self.document = Some(document);
        self.equivalent_selectors = None;
        self
    }

    /// The analysed stylesheet, virtual shorthands included.
    #[must_use]
    pub fn stylesheet(&self) -> &StyleSheet {
        self.sheet
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Items recorded by the declaration passes run so far.
    #[must_use]
    pub const fn items(&self) -> &ItemRegistry {
        &self.items
    }

    /// Type I: classes of literally equal declarations spanning at least
    /// two selectors.
    pub fn find_identical_declarations(&mut self) -> &DuplicationIncidents {
        let found = match self.identical_declarations.take() {
            Some(found) => found,
            None => self.detect_identical_declarations(),
        };
        self.identical_declarations.insert(found)
    }

    /// Type II: pairs of equivalent declarations in different selectors
    /// whose literal forms differ.
    pub fn find_equivalent_declarations(&mut self) -> &DuplicationIncidents {
        let found = match self.equivalent_declarations.take() {
            Some(found) => found,
            None => self.detect_equivalent_declarations(),
        };
        self.equivalent_declarations.insert(found)
    }

    /// Type III: authored shorthands duplicating the longhands of another
    /// selector.
    pub fn find_shorthand_duplications(&mut self) -> &DuplicationIncidents {
        let found = match self.shorthand_declarations.take() {
            Some(found) => found,
            None => self.detect_shorthand_duplications(),
        };
        self.shorthand_declarations.insert(found)
    }

    /// Type IV-A: groups of structurally equal selectors.
    pub fn find_identical_selectors(&mut self) -> &DuplicationIncidents {
        let found = match self.identical_selectors.take() {
            Some(found) => found,
            None => self.detect_identical_selectors(),
        };
        self.identical_selectors.insert(found)
    }

    /// Type IV-B: groups of selectors matching the same elements of the
    /// bound document. Empty when no document is bound.
    pub fn find_equivalent_selectors(&mut self) -> &DuplicationIncidents {
        let found = match self.equivalent_selectors.take() {
            Some(found) => found,
            None => self.detect_equivalent_selectors(),
        };
        self.equivalent_selectors.insert(found)
    }

    /// The cached instances of `kind`; empty if its pass has not run.
    #[must_use]
    pub fn incidents(&self, kind: DuplicationKind) -> &[DuplicationInstance] {
        let found = match kind {
            DuplicationKind::IdenticalDeclarations => &self.identical_declarations,
            DuplicationKind::EquivalentDeclarations => &self.equivalent_declarations,
            DuplicationKind::ShorthandDeclarations => &self.shorthand_declarations,
            DuplicationKind::IdenticalSelectors => &self.identical_selectors,
            DuplicationKind::EquivalentSelectors => &self.equivalent_selectors,
        };
        found.as_deref().unwrap_or_default()
    }

    /// Run every pass and summarize the result.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidOptions`] if the options fail validation.
    /// Selectors the document cannot evaluate are skipped, not failed.
    pub fn run_all(&mut self) -> Result<DuplicationReport, AnalysisError> {
        self.options.validate()?;
        let span = info_span!("duplication_analysis", selectors = self.sheet.selector_count());
        let _guard = span.enter();
        let _ = self.find_identical_declarations();
        let _ = self.find_equivalent_declarations();
        let _ = self.find_shorthand_duplications();
        let _ = self.find_identical_selectors();
        let _ = self.find_equivalent_selectors();
        Ok(DuplicationReport::build(self))
    }

    /// Hand the per-selector item sets to `miner`, running the declaration
    /// passes first if needed.
    pub fn mine_frequent_itemsets(&mut self, miner: &dyn ItemsetMiner) -> Vec<FrequentItemset> {
        let _ = self.find_identical_declarations();
        let _ = self.find_equivalent_declarations();
        let _ = self.find_shorthand_duplications();
        let min_support = self.options.min_support;
        let transactions = self.items.item_sets(min_support);
        debug!(
            transactions = transactions.len(),
            items = self.items.len(),
            min_support,
            "mining frequent itemsets"
        );
        miner.mine(&transactions, min_support)
    }

    /// The elements of the bound document `selector` matches.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::NoDocument`] without a bound document.
    /// - [`AnalysisError::UnknownSelector`] for an id from another stylesheet.
    /// - [`AnalysisError::UnsupportedSelector`] when the selector has no
    ///   XPath equivalent.
    /// - [`AnalysisError::Query`] when the document rejects the query.
    pub fn matched_nodes(&self, selector: SelectorId) -> Result<Vec<NodeId>, AnalysisError> {
        let document = self.document.ok_or(AnalysisError::NoDocument)?;
        let entry = self
            .sheet
            .selector(selector)
            .ok_or(AnalysisError::UnknownSelector(selector))?;
        let xpath = entry.to_xpath()?;
        Ok(document.query(&xpath)?)
    }

    /// The media context compared for `selector` under the options.
    fn media_key(&self, selector: SelectorId) -> Vec<String> {
        if self.options.consider_media_queries {
            self.sheet.media_of(selector).to_vec()
        } else {
            Vec::new()
        }
    }
}
