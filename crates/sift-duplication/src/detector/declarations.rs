//! Declaration-level passes: Types I, II and III.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use sift_css::declaration::{compose_virtual, individuals_match};
use sift_css::properties::split_vendor_prefix;
use sift_css::{Declaration, DeclarationId, DeclarationKey, SelectorId};
use tracing::{debug, info_span, trace};

use super::DuplicationDetector;
use crate::instance::{DeclarationRef, DuplicationIncidents, DuplicationInstance, DuplicationKind};
use crate::items::ItemSignature;

/// An authored declaration and the selector it belongs to.
type Member = (SelectorId, DeclarationId);

impl DuplicationDetector<'_> {
    pub(super) fn detect_identical_declarations(&mut self) -> DuplicationIncidents {
        let span = info_span!("identical_declarations");
        let _guard = span.enter();
        let strip = self.options.ignore_vendor_prefixes;
        let mut found = Vec::new();
        for members in self.partition(|d| d.equality_key(strip)) {
            let selectors = selectors_of(&members);
            if selectors.len() < 2 {
                continue;
            }
            self.record_members(DuplicationKind::IdenticalDeclarations, &members);
            found.push(DuplicationInstance {
                kind: DuplicationKind::IdenticalDeclarations,
                selectors,
                declarations: authored(&members),
            });
        }
        debug!(instances = found.len(), "identical declarations");
        found
    }

    /// One instance per pair of equivalent declarations in different
    /// selectors whose literal forms differ. Literally equal pairs are
    /// Type I only and are not repeated here.
    pub(super) fn detect_equivalent_declarations(&mut self) -> DuplicationIncidents {
        let span = info_span!("equivalent_declarations");
        let _guard = span.enter();
        let strip = self.options.ignore_vendor_prefixes;
        let mut found = Vec::new();
        for members in self.partition(|d| d.equivalence_key(strip)) {
            if selectors_of(&members).len() < 2 {
                continue;
            }
            let keyed: Vec<(Member, DeclarationKey)> = members
                .iter()
                .filter_map(|&member| {
                    self.sheet
                        .declaration(member.1)
                        .map(|d| (member, d.equality_key(strip)))
                })
                .collect();
            let mut in_pair = vec![false; keyed.len()];
            let mut pairs = Vec::new();
            for (i, (first, first_key)) in keyed.iter().enumerate() {
                for (j, (second, second_key)) in keyed.iter().enumerate().skip(i + 1) {
                    if first.0 == second.0 || first_key == second_key {
                        continue;
                    }
                    in_pair[i] = true;
                    in_pair[j] = true;
                    pairs.push(DuplicationInstance {
                        kind: DuplicationKind::EquivalentDeclarations,
                        selectors: BTreeSet::from([first.0, second.0]),
                        declarations: authored(&[*first, *second]),
                    });
                }
            }
            if pairs.is_empty() {
                continue;
            }
            let linked: Vec<Member> = keyed
                .iter()
                .zip(&in_pair)
                .filter(|&(_, &paired)| paired)
                .map(|((member, _), _)| *member)
                .collect();
            self.record_members(DuplicationKind::EquivalentDeclarations, &linked);
            found.extend(pairs);
        }
        debug!(instances = found.len(), "equivalent declarations");
        found
    }

    /// For every selector, compose a virtual shorthand for each shorthand
    /// whose longhands it declares, and pair it with every authored
    /// shorthand of another selector that decomposes the same way.
    pub(super) fn detect_shorthand_duplications(&mut self) -> DuplicationIncidents {
        let span = info_span!("shorthand_duplications");
        let _guard = span.enter();
        let authored_shorthands: Vec<Member> = self
            .sheet
            .all_declarations()
            .filter(|(_, d)| d.is_shorthand())
            .filter_map(|(id, d)| d.selector().map(|s| (s, id)))
            .collect();
        let selectors: Vec<SelectorId> = self.sheet.all_selectors().map(|(id, _)| id).collect();

        let mut found = Vec::new();
        for selector in selectors {
            for composed in self.virtual_shorthands(selector) {
                let matches: Vec<Member> = authored_shorthands
                    .iter()
                    .copied()
                    .filter(|&(owner, id)| {
                        owner != selector && self.matches_virtual(selector, &composed, owner, id)
                    })
                    .collect();
                if matches.is_empty() {
                    continue;
                }
                trace!(
                    selector = selector.0,
                    property = composed.property(),
                    matches = matches.len(),
                    "virtual shorthand matched"
                );
                let longhands = self.longhands_of(selector, &composed);
                let virtual_ref = DeclarationRef::Virtual {
                    selector,
                    declaration: self.attach_once(selector, composed),
                };
                for (owner, id) in matches {
                    let shorthand = DeclarationRef::Authored(id);
                    if let Some(signature) = self.signature(owner, id) {
                        let property = self.item_property(id);
                        let _ = self.items.record(
                            signature,
                            &property,
                            DuplicationKind::ShorthandDeclarations,
                            [(owner, shorthand), (selector, virtual_ref)],
                        );
                    }
                    let mut declarations = vec![shorthand, virtual_ref];
                    declarations.extend(longhands.iter().map(|&l| DeclarationRef::Authored(l)));
                    found.push(DuplicationInstance {
                        kind: DuplicationKind::ShorthandDeclarations,
                        selectors: BTreeSet::from([selector, owner]),
                        declarations,
                    });
                }
            }
        }
        debug!(instances = found.len(), "shorthand duplications");
        found
    }

    /// Authored declarations grouped by `key_of` and media context, classes
    /// in order of first member.
    fn partition<K, F>(&self, key_of: F) -> Vec<Vec<Member>>
    where
        K: Eq + Hash,
        F: Fn(&Declaration) -> K,
    {
        let mut index: HashMap<(Vec<String>, K), usize> = HashMap::new();
        let mut classes: Vec<Vec<Member>> = Vec::new();
        for (id, declaration) in self.sheet.all_declarations() {
            let Some(selector) = declaration.selector() else {
                continue;
            };
            let key = (self.media_key(selector), key_of(declaration));
            let class = *index.entry(key).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[class].push((selector, id));
        }
        classes
    }

    /// Virtual shorthands for `selector`, one per shorthand that is not
    /// itself declared but has at least one longhand declared.
    fn virtual_shorthands(&self, selector: SelectorId) -> Vec<Declaration> {
        let declarations: Vec<&Declaration> =
            self.sheet.declarations_of(selector).map(|(_, d)| d).collect();
        let prefixes: BTreeSet<&str> = declarations
            .iter()
            .map(|d| split_vendor_prefix(d.property()).0)
            .collect();
        let mut composed = Vec::new();
        for prefix in prefixes {
            for shorthand in self.tables.shorthands() {
                let name = format!("{prefix}{shorthand}");
                if declarations.iter().any(|d| d.property() == name) {
                    continue;
                }
                composed.extend(compose_virtual(self.tables, &name, &declarations));
            }
        }
        composed
    }

    /// The authored declarations of `selector` that `composed` was built
    /// from, overridden ones included.
    fn longhands_of(&self, selector: SelectorId, composed: &Declaration) -> Vec<DeclarationId> {
        let (prefix, base) = split_vendor_prefix(composed.property());
        let leaves = self.tables.slot_properties(base);
        self.sheet
            .declarations_of(selector)
            .filter(|(_, d)| {
                let (own_prefix, own_base) = split_vendor_prefix(d.property());
                own_prefix == prefix
                    && self
                        .tables
                        .slot_properties(own_base)
                        .iter()
                        .all(|slot| leaves.contains(slot))
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn matches_virtual(
        &self,
        selector: SelectorId,
        composed: &Declaration,
        owner: SelectorId,
        id: DeclarationId,
    ) -> bool {
        let Some(candidate) = self.sheet.declaration(id) else {
            return false;
        };
        let same_property = if self.options.ignore_vendor_prefixes {
            candidate.unprefixed_property() == composed.unprefixed_property()
        } else {
            candidate.property() == composed.property()
        };
        same_property
            && self.media_key(selector) == self.media_key(owner)
            && individuals_match(candidate, composed, self.options.ignore_vendor_prefixes)
    }

    /// Attach `composed` to `selector` unless an identical virtual shorthand
    /// is already there.
    fn attach_once(&mut self, selector: SelectorId, composed: Declaration) -> DeclarationId {
        let existing = self.sheet.selector(selector).and_then(|entry| {
            entry.virtual_declarations().iter().copied().find(|&id| {
                self.sheet
                    .declaration(id)
                    .is_some_and(|d| d.property() == composed.property() && d.declaration_equals(&composed))
            })
        });
        existing.unwrap_or_else(|| self.sheet.attach_virtual(selector, composed))
    }

    /// The item signature of an authored declaration.
    fn signature(&self, selector: SelectorId, id: DeclarationId) -> Option<ItemSignature> {
        let declaration = self.sheet.declaration(id)?;
        Some(ItemSignature {
            media: self.media_key(selector),
            declaration: declaration.equivalence_key(self.options.ignore_vendor_prefixes),
        })
    }

    fn item_property(&self, id: DeclarationId) -> String {
        self.sheet.declaration(id).map_or_else(String::new, |d| {
            if self.options.ignore_vendor_prefixes {
                d.unprefixed_property().to_string()
            } else {
                d.property().to_string()
            }
        })
    }

    /// Feed one Type I or II class to the item registry, keyed by its
    /// first member.
    fn record_members(&mut self, kind: DuplicationKind, members: &[Member]) {
        let Some(&(selector, id)) = members.first() else {
            return;
        };
        let Some(signature) = self.signature(selector, id) else {
            return;
        };
        let property = self.item_property(id);
        let _ = self.items.record(
            signature,
            &property,
            kind,
            members
                .iter()
                .map(|&(selector, id)| (selector, DeclarationRef::Authored(id))),
        );
    }
}

fn selectors_of(members: &[Member]) -> BTreeSet<SelectorId> {
    members.iter().map(|&(selector, _)| selector).collect()
}

fn authored(members: &[Member]) -> Vec<DeclarationRef> {
    members
        .iter()
        .map(|&(_, id)| DeclarationRef::Authored(id))
        .collect()
}
