//! Stable per-message identity used as the ledger key.

use std::fmt;

use crate::transport::MailItem;

/// Store marker used when neither the item nor its folder names a store.
pub const UNKNOWN_STORE: &str = "UNKNOWN_STORE";

/// Prefix of run-scoped entry identifiers.
pub const SYNTHETIC_ENTRY_PREFIX: &str = "UNKNOWN_ENTRY_";

/// `(entry_id, store_id)` pair identifying one physical message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageIdentity {
    pub entry_id: String,
    pub store_id: String,
    /// The entry id was made up for this run and is not stable across runs.
    pub synthetic: bool,
}

impl MessageIdentity {
    pub fn new(entry_id: impl Into<String>, store_id: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            store_id: store_id.into(),
            synthetic: false,
        }
    }

    pub fn is_stable(&self) -> bool {
        !self.synthetic
    }
}

impl fmt::Display for MessageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.store_id, self.entry_id)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Derives the identity of `item`. Never fails.
///
/// The store falls back to the containing folder's store, then to
/// [`UNKNOWN_STORE`]. A missing entry id is replaced by one derived from the
/// item's session handle, flagged as synthetic.
pub fn resolve(item: &MailItem) -> MessageIdentity {
    let store_id = present(&item.store_id)
        .or_else(|| present(&item.parent_store_id))
        .unwrap_or(UNKNOWN_STORE)
        .to_string();

    match present(&item.entry_id) {
        Some(entry_id) => MessageIdentity::new(entry_id, store_id),
        None => MessageIdentity {
            entry_id: format!("{}{}", SYNTHETIC_ENTRY_PREFIX, item.local_key),
            store_id,
            synthetic: true,
        },
    }
}
