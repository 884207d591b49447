//! A serializable summary of an analysis run.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sift_css::{SelectorId, StyleSheet};
use strum::IntoEnumIterator;

use crate::AnalysisError;
use crate::detector::DuplicationDetector;
use crate::instance::{DuplicationInstance, DuplicationKind};
use crate::items::Item;

/// An instance with selectors and declarations rendered as CSS text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedInstance {
    /// Which pass found it.
    pub kind: DuplicationKind,
    /// Selector text, prefixed by its `@media` context when it has one.
    pub selectors: Vec<String>,
    /// Declarations as `property: values`.
    pub declarations: Vec<String>,
}

/// An item with its support rendered as selector text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedItem {
    /// Property name.
    pub property: String,
    /// The canonical signature.
    pub signature: String,
    /// The passes that found it.
    pub kinds: BTreeSet<DuplicationKind>,
    /// The selectors containing a member.
    pub support: Vec<String>,
}

/// Counts and instances of every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicationReport {
    /// Instances per kind; every kind is present.
    pub counts: BTreeMap<DuplicationKind, usize>,
    /// Every instance, grouped by kind in pass order.
    pub instances: Vec<ReportedInstance>,
    /// Every item in discovery order.
    pub items: Vec<ReportedItem>,
}

impl DuplicationReport {
    pub(crate) fn build(detector: &DuplicationDetector<'_>) -> Self {
        let sheet = detector.stylesheet();
        let mut counts = BTreeMap::new();
        let mut instances = Vec::new();
        for kind in DuplicationKind::iter() {
            let found = detector.incidents(kind);
            let _ = counts.insert(kind, found.len());
            instances.extend(found.iter().map(|instance| render_instance(sheet, instance)));
        }
        let items = detector
            .items()
            .items()
            .iter()
            .map(|item| render_item(sheet, item))
            .collect();
        Self {
            counts,
            instances,
            items,
        }
    }

    /// Number of instances of `kind`.
    #[must_use]
    pub fn count(&self, kind: DuplicationKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn render_selector(sheet: &StyleSheet, id: SelectorId) -> String {
    let Some(entry) = sheet.selector(id) else {
        return format!("#{}", id.0);
    };
    if entry.media().is_empty() {
        entry.text().to_string()
    } else {
        format!("@media {} {{ {} }}", entry.media().join(" and "), entry.text())
    }
}

fn render_instance(sheet: &StyleSheet, instance: &DuplicationInstance) -> ReportedInstance {
    ReportedInstance {
        kind: instance.kind,
        selectors: instance
            .selectors
            .iter()
            .map(|&id| render_selector(sheet, id))
            .collect(),
        declarations: instance
            .declarations
            .iter()
            .filter_map(|&reference| sheet.declaration(reference.id()))
            .map(ToString::to_string)
            .collect(),
    }
}

fn render_item(sheet: &StyleSheet, item: &Item) -> ReportedItem {
    ReportedItem {
        property: item.property.clone(),
        signature: item.signature.to_string(),
        kinds: item.kinds.clone(),
        support: item
            .support
            .iter()
            .map(|&id| render_selector(sheet, id))
            .collect(),
    }
}
