//! Selector-level passes: Types IV-A and IV-B.

use std::collections::{BTreeSet, HashMap};

use sift_css::SelectorId;
use sift_css::stylesheet::SelectorEntryKey;
use sift_dom::NodeId;
use tracing::{debug, info_span, warn};

use super::DuplicationDetector;
use crate::instance::{DuplicationIncidents, DuplicationInstance, DuplicationKind};

impl DuplicationDetector<'_> {
    pub(super) fn detect_identical_selectors(&self) -> DuplicationIncidents {
        let span = info_span!("identical_selectors");
        let _guard = span.enter();
        let consider_media = self.options.consider_media_queries;
        let mut index: HashMap<SelectorEntryKey, usize> = HashMap::new();
        let mut groups: Vec<BTreeSet<SelectorId>> = Vec::new();
        for (id, entry) in self.sheet.all_selectors() {
            let group = *index.entry(entry.equality_key(consider_media)).or_insert_with(|| {
                groups.push(BTreeSet::new());
                groups.len() - 1
            });
            let _ = groups[group].insert(id);
        }
        let found: DuplicationIncidents = groups
            .into_iter()
            .filter(|group| group.len() >= 2)
            .map(|group| DuplicationInstance::of_selectors(DuplicationKind::IdenticalSelectors, group))
            .collect();
        debug!(instances = found.len(), "identical selectors");
        found
    }

    /// Selectors are grouped by the set of elements they match. A group is
    /// reported when it holds at least two structurally different
    /// selectors. Selectors that cannot be evaluated or match nothing are
    /// left out.
    pub(super) fn detect_equivalent_selectors(&self) -> DuplicationIncidents {
        let span = info_span!("equivalent_selectors");
        let _guard = span.enter();
        if self.document.is_none() {
            debug!("no document bound, skipping equivalent selectors");
            return Vec::new();
        }
        if !self.options.report_equivalent_selectors {
            debug!("equivalent selectors disabled");
            return Vec::new();
        }

        let consider_media = self.options.consider_media_queries;
        let mut index: HashMap<(Vec<String>, BTreeSet<NodeId>), usize> = HashMap::new();
        let mut groups: Vec<BTreeSet<SelectorId>> = Vec::new();
        let mut skipped = 0_usize;
        for (id, entry) in self.sheet.all_selectors() {
            let nodes: BTreeSet<NodeId> = match self.matched_nodes(id) {
                Ok(nodes) => nodes.into_iter().collect(),
                Err(error) => {
                    warn!(selector = entry.text(), %error, "skipping selector");
                    skipped += 1;
                    continue;
                }
            };
            if nodes.is_empty() {
                debug!(selector = entry.text(), "selector matches no element");
                continue;
            }
            let key = (self.media_key(id), nodes);
            let group = *index.entry(key).or_insert_with(|| {
                groups.push(BTreeSet::new());
                groups.len() - 1
            });
            let _ = groups[group].insert(id);
        }

        let found: DuplicationIncidents = groups
            .into_iter()
            .filter(|group| {
                let structural: BTreeSet<SelectorEntryKey> = group
                    .iter()
                    .filter_map(|&id| self.sheet.selector(id))
                    .map(|entry| entry.equality_key(consider_media))
                    .collect();
                structural.len() >= 2
            })
            .map(|group| DuplicationInstance::of_selectors(DuplicationKind::EquivalentSelectors, group))
            .collect();
        debug!(instances = found.len(), skipped, "equivalent selectors");
        found
    }
}
