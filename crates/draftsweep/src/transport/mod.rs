//! Mail transport capability interface.
//!
//! The scan pipeline only reads from messages and creates drafts. Everything it
//! needs from a mailbox is expressed by [`MailTransport`]; the IMAP adapter and
//! the in-memory adapter both implement it.

pub mod error;
pub mod imap;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::{Result, TransportError};
pub use imap::ImapTransport;
pub use memory::MemoryTransport;

/// Folder the scan should enumerate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderTarget {
    /// The account's default inbox.
    Inbox,
    /// `folder` below the named mailbox root.
    Named { mailbox: String, folder: String },
}

impl FolderTarget {
    /// Without a mailbox name the default inbox is used and `folder` is ignored.
    pub fn from_names(mailbox: Option<&str>, folder: &str) -> Self {
        match mailbox {
            Some(mailbox) if !mailbox.is_empty() => FolderTarget::Named {
                mailbox: mailbox.to_string(),
                folder: folder.to_string(),
            },
            _ => FolderTarget::Inbox,
        }
    }
}

/// An opened folder, as returned by [`MailTransport::open_folder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderRef {
    /// Transport-specific folder path.
    pub path: String,
    /// Identity of the store (account) holding the folder.
    pub store_id: String,
}

/// Restrictions applied by the transport while enumerating a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub unread_only: bool,
    pub received_since: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Mail,
    MeetingRequest,
    Other(String),
}

/// Read view over a single folder item.
///
/// Every mailbox-provided field is optional: a lookup the transport could not
/// answer is `None`, never an error.
#[derive(Debug, Clone, PartialEq)]
pub struct MailItem {
    /// Handle valid for the current session only (IMAP UID, list position, ...).
    pub local_key: u64,
    pub kind: ItemKind,
    pub entry_id: Option<String>,
    pub store_id: Option<String>,
    /// Store of the folder containing the item.
    pub parent_store_id: Option<String>,
    /// Code of the last action taken on the item.
    pub last_verb: Option<i64>,
    pub replied: Option<bool>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub sender_name: Option<String>,
    pub sender_address: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
    pub unread: bool,
}

impl MailItem {
    /// A bare mail item with nothing but its session handle.
    pub fn mail(local_key: u64) -> Self {
        Self {
            local_key,
            kind: ItemKind::Mail,
            entry_id: None,
            store_id: None,
            parent_store_id: None,
            last_verb: None,
            replied: None,
            subject: None,
            body: None,
            sender_name: None,
            sender_address: None,
            received_at: None,
            unread: true,
        }
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_entry_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    pub fn with_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.store_id = Some(store_id.into());
        self
    }

    pub fn with_parent_store_id(mut self, store_id: impl Into<String>) -> Self {
        self.parent_store_id = Some(store_id.into());
        self
    }

    pub fn with_last_verb(mut self, verb: i64) -> Self {
        self.last_verb = Some(verb);
        self
    }

    pub fn with_replied(mut self, replied: bool) -> Self {
        self.replied = Some(replied);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_sender(mut self, name: impl Into<String>, address: impl Into<String>) -> Self {
        self.sender_name = Some(name.into());
        self.sender_address = Some(address.into());
        self
    }

    pub fn with_received_at(mut self, received_at: DateTime<Utc>) -> Self {
        self.received_at = Some(received_at);
        self
    }

    pub fn with_unread(mut self, unread: bool) -> Self {
        self.unread = unread;
        self
    }

    pub fn is_mail(&self) -> bool {
        self.kind == ItemKind::Mail
    }
}

/// An unsent reply, pre-populated with the quoted original.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyDraft {
    /// `local_key` of the message being answered.
    pub source_key: u64,
    pub to_name: Option<String>,
    pub to_address: Option<String>,
    pub subject: String,
    pub in_reply_to: Option<String>,
    pub body: String,
}

impl ReplyDraft {
    /// Reply addressed to the sender with the original quoted under a header block.
    pub fn quoting(item: &MailItem) -> Self {
        let subject = item.subject.as_deref().unwrap_or_default();
        let from = match (&item.sender_name, &item.sender_address) {
            (Some(name), Some(address)) => format!("{} <{}>", name, address),
            (Some(name), None) => name.clone(),
            (None, Some(address)) => address.clone(),
            (None, None) => String::new(),
        };
        let sent = item
            .received_at
            .map(|at| at.format("%A, %B %-d, %Y %-I:%M %p").to_string())
            .unwrap_or_default();

        let body = format!(
            "-----Original Message-----\nFrom: {}\nSent: {}\nSubject: {}\n\n{}",
            from,
            sent,
            subject,
            item.body.as_deref().unwrap_or_default()
        );

        Self {
            source_key: item.local_key,
            to_name: item.sender_name.clone(),
            to_address: item.sender_address.clone(),
            subject: format!("RE: {}", subject),
            in_reply_to: item.entry_id.clone(),
            body,
        }
    }
}

/// Capabilities the scan pipeline needs from a mailbox.
#[async_trait]
pub trait MailTransport: Send {
    /// Resolves the folder to scan. Fails when it does not exist.
    async fn open_folder(&mut self, target: &FolderTarget) -> Result<FolderRef>;

    /// Items in `folder` matching `query`, newest receipt first.
    async fn list_items(&mut self, folder: &FolderRef, query: &ItemQuery) -> Result<Vec<MailItem>>;

    /// Builds the reply the mailbox would offer for `item`.
    async fn reply_template(&mut self, item: &MailItem) -> Result<ReplyDraft>;

    /// Persists `draft` without sending it.
    async fn save_draft(&mut self, draft: ReplyDraft) -> Result<()>;

    /// Releases the session.
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
