//! Processed-set ledger: which messages already received a draft.

pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::MessageIdentity;

pub use store::LedgerStore;

/// Mapping `store_id -> entry_id -> handled`.
///
/// Once marked, an identity stays handled until [`ProcessedLedger::reset`].
/// A missing entry means "not handled".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessedLedger {
    processed: BTreeMap<String, BTreeMap<String, bool>>,
}

impl ProcessedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the identity's entry is present and true.
    pub fn has(&self, identity: &MessageIdentity) -> bool {
        self.processed
            .get(&identity.store_id)
            .and_then(|entries| entries.get(&identity.entry_id))
            .copied()
            .unwrap_or(false)
    }

    /// Marks `identity` handled. Returns false if it already was.
    pub fn mark(&mut self, identity: &MessageIdentity) -> bool {
        let entry = self
            .processed
            .entry(identity.store_id.clone())
            .or_default()
            .entry(identity.entry_id.clone())
            .or_insert(false);

        let newly_marked = !*entry;
        *entry = true;
        newly_marked
    }

    /// Forgets every handled message.
    pub fn reset(&mut self) {
        self.processed.clear();
    }

    /// Number of handled messages across all stores.
    pub fn len(&self) -> usize {
        self.processed
            .values()
            .map(|entries| entries.values().filter(|handled| **handled).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn store_count(&self) -> usize {
        self.processed.len()
    }

    /// `(store_id, handled count)` per store, ordered by store id.
    pub fn stores(&self) -> impl Iterator<Item = (&str, usize)> {
        self.processed.iter().map(|(store, entries)| {
            (
                store.as_str(),
                entries.values().filter(|handled| **handled).count(),
            )
        })
    }
}
