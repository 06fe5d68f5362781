//! Builders for mail items used across the scan tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use draftsweep::transport::{ItemKind, MailItem};

pub const STORE: &str = "store-a";

/// Reference time every harness scan runs at.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    now() - Duration::hours(hours)
}

/// Builder for an inbox message.
pub struct MailBuilder {
    item: MailItem,
}

impl MailBuilder {
    /// An unread message received an hour ago whose body matches the default phrasings.
    pub fn matching(local_key: u64, entry_id: &str) -> Self {
        Self {
            item: MailItem::mail(local_key)
                .with_entry_id(entry_id)
                .with_store_id(STORE)
                .with_subject("Lot 4411 disposition")
                .with_body("Additional rework is not expected to improve yield on this lot.")
                .with_sender("Dana Lee", "dana@example.com")
                .with_received_at(hours_ago(1)),
        }
    }

    /// Same as [`MailBuilder::matching`] but with a body no pattern matches.
    pub fn unrelated(local_key: u64, entry_id: &str) -> Self {
        Self::matching(local_key, entry_id).body("Lunch is at noon.")
    }

    pub fn body(mut self, body: &str) -> Self {
        self.item.body = Some(body.to_string());
        self
    }

    pub fn subject(mut self, subject: &str) -> Self {
        self.item.subject = Some(subject.to_string());
        self
    }

    pub fn sender_name(mut self, name: Option<&str>) -> Self {
        self.item.sender_name = name.map(str::to_string);
        self
    }

    pub fn last_verb(mut self, verb: i64) -> Self {
        self.item.last_verb = Some(verb);
        self
    }

    pub fn replied(mut self) -> Self {
        self.item.replied = Some(true);
        self
    }

    pub fn read(mut self) -> Self {
        self.item.unread = false;
        self
    }

    pub fn received(mut self, at: DateTime<Utc>) -> Self {
        self.item.received_at = Some(at);
        self
    }

    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.item.kind = kind;
        self
    }

    pub fn without_entry_id(mut self) -> Self {
        self.item.entry_id = None;
        self
    }

    pub fn without_store(mut self) -> Self {
        self.item.store_id = None;
        self
    }

    pub fn parent_store(mut self, store_id: &str) -> Self {
        self.item.parent_store_id = Some(store_id.to_string());
        self
    }

    pub fn build(self) -> MailItem {
        self.item
    }
}
