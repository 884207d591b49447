//! Items: one per class of equal or equivalent declarations, with the
//! selectors that contain a member.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::Serialize;
use sift_css::{DeclarationKey, MediaQueryList, SelectorId};

use crate::instance::{DeclarationRef, DuplicationKind};

/// Index of an [`Item`] in its [`ItemRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(pub usize);

/// What makes declarations the same item: their canonical form and, when
/// media is considered, the media context they apply in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemSignature {
    /// Enclosing `@media` preludes; empty when media is ignored.
    pub media: MediaQueryList,
    /// The declaration's equivalence key.
    pub declaration: DeclarationKey,
}

impl fmt::Display for ItemSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.media.is_empty() {
            write!(f, "@media {} ", self.media.join(" and "))?;
        }
        write!(f, "{}", self.declaration)
    }
}

/// A class of redundant declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Canonical identity.
    pub signature: ItemSignature,
    /// Property name as written on the members.
    pub property: String,
    /// Selectors containing a member.
    pub support: BTreeSet<SelectorId>,
    /// The passes that found the class.
    pub kinds: BTreeSet<DuplicationKind>,
    /// The member declarations.
    pub members: BTreeSet<DeclarationRef>,
}

/// The items of one selector, handed to an itemset miner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSet {
    /// The selector.
    pub selector: SelectorId,
    /// Its items.
    pub items: BTreeSet<ItemId>,
}

/// Items in discovery order, found again by signature.
#[derive(Debug, Clone, Default)]
pub struct ItemRegistry {
    items: Vec<Item>,
    by_signature: HashMap<ItemSignature, ItemId>,
}

impl ItemRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `members` to the item for `signature`, creating it on first
    /// sight, and mark it as found by `kind`.
    pub fn record(
        &mut self,
        signature: ItemSignature,
        property: &str,
        kind: DuplicationKind,
        members: impl IntoIterator<Item = (SelectorId, DeclarationRef)>,
    ) -> ItemId {
        let id = match self.by_signature.get(&signature) {
            Some(&id) => id,
            None => {
                let id = ItemId(self.items.len());
                self.items.push(Item {
                    signature: signature.clone(),
                    property: property.to_string(),
                    support: BTreeSet::new(),
                    kinds: BTreeSet::new(),
                    members: BTreeSet::new(),
                });
                let _ = self.by_signature.insert(signature, id);
                id
            }
        };
        let item = &mut self.items[id.0];
        let _ = item.kinds.insert(kind);
        for (selector, member) in members {
            let _ = item.support.insert(selector);
            let _ = item.members.insert(member);
        }
        id
    }

    /// Every item in discovery order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// An item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0)
    }

    /// The item for `signature`, if one was recorded.
    #[must_use]
    pub fn find(&self, signature: &ItemSignature) -> Option<ItemId> {
        self.by_signature.get(signature).copied()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no item was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items of one property, vendor prefix included.
    pub fn items_for_property<'r>(
        &'r self,
        property: &'r str,
    ) -> impl Iterator<Item = (ItemId, &'r Item)> + 'r {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, item)| item.property == property)
            .map(|(index, item)| (ItemId(index), item))
    }

    /// Items grouped by property name.
    #[must_use]
    pub fn by_property(&self) -> BTreeMap<&str, Vec<ItemId>> {
        let mut grouped: BTreeMap<&str, Vec<ItemId>> = BTreeMap::new();
        for (index, item) in self.items.iter().enumerate() {
            grouped.entry(item.property.as_str()).or_default().push(ItemId(index));
        }
        grouped
    }

    /// Per-selector item sets over the items supported by at least
    /// `min_support` selectors. Selectors left with no item are omitted.
    #[must_use]
    pub fn item_sets(&self, min_support: usize) -> Vec<ItemSet> {
        let mut by_selector: BTreeMap<SelectorId, BTreeSet<ItemId>> = BTreeMap::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.support.len() < min_support {
                continue;
            }
            for &selector in &item.support {
                let _ = by_selector.entry(selector).or_default().insert(ItemId(index));
            }
        }
        by_selector
            .into_iter()
            .map(|(selector, items)| ItemSet { selector, items })
            .collect()
    }
}
