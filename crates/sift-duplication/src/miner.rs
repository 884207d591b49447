//! The contract with a frequent-itemset mining routine.

use std::collections::BTreeSet;

use serde::Serialize;
use sift_css::SelectorId;

use crate::items::{ItemId, ItemSet};

/// Items that occur together in enough selectors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FrequentItemset {
    /// The items.
    pub items: BTreeSet<ItemId>,
    /// The selectors containing every one of them.
    pub support: BTreeSet<SelectorId>,
}

/// A frequent-itemset miner such as Apriori or FP-Growth.
pub trait ItemsetMiner {
    /// Every itemset contained in at least `min_support` of
    /// `transactions`.
    fn mine(&self, transactions: &[ItemSet], min_support: usize) -> Vec<FrequentItemset>;
}

impl<F> ItemsetMiner for F
where
    F: Fn(&[ItemSet], usize) -> Vec<FrequentItemset>,
{
    fn mine(&self, transactions: &[ItemSet], min_support: usize) -> Vec<FrequentItemset> {
        self(transactions, min_support)
    }
}
