//! In-memory mail transport.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;

use super::error::{Result, TransportError};
use super::{FolderRef, FolderTarget, ItemQuery, MailItem, MailTransport, ReplyDraft};

const INBOX: &str = "Inbox";

/// Mailbox held entirely in process memory.
///
/// Applies the same query semantics as a server-side transport and keeps every
/// saved draft for inspection.
pub struct MemoryTransport {
    store_id: String,
    folders: BTreeMap<String, Vec<MailItem>>,
    drafts: Vec<ReplyDraft>,
    failing_drafts: HashSet<u64>,
    opened: usize,
    listed: usize,
    closed: bool,
}

impl MemoryTransport {
    /// Creates a mailbox containing an empty inbox.
    pub fn new(store_id: impl Into<String>) -> Self {
        let mut folders = BTreeMap::new();
        folders.insert(INBOX.to_string(), Vec::new());

        Self {
            store_id: store_id.into(),
            folders,
            drafts: Vec::new(),
            failing_drafts: HashSet::new(),
            opened: 0,
            listed: 0,
            closed: false,
        }
    }

    fn folder_path(target: &FolderTarget) -> String {
        match target {
            FolderTarget::Inbox => INBOX.to_string(),
            FolderTarget::Named { mailbox, folder } => format!("{}/{}", mailbox, folder),
        }
    }

    /// Creates `folder` below `mailbox` if it does not exist yet.
    pub fn add_folder(&mut self, mailbox: &str, folder: &str) {
        let path = Self::folder_path(&FolderTarget::Named {
            mailbox: mailbox.to_string(),
            folder: folder.to_string(),
        });
        self.folders.entry(path).or_default();
    }

    /// Places `item` in the default inbox.
    pub fn deliver(&mut self, item: MailItem) {
        self.deliver_to(&FolderTarget::Inbox, item);
    }

    /// Places `item` in `target`, creating the folder if needed.
    pub fn deliver_to(&mut self, target: &FolderTarget, item: MailItem) {
        self.folders
            .entry(Self::folder_path(target))
            .or_default()
            .push(item);
    }

    /// Makes `save_draft` fail for replies to the item with `local_key`.
    pub fn fail_drafts_for(&mut self, local_key: u64) {
        self.failing_drafts.insert(local_key);
    }

    /// Lets drafts for `local_key` succeed again.
    pub fn clear_draft_failure(&mut self, local_key: u64) {
        self.failing_drafts.remove(&local_key);
    }

    pub fn drafts(&self) -> &[ReplyDraft] {
        &self.drafts
    }

    /// Number of `open_folder` calls, successful or not.
    pub fn open_calls(&self) -> usize {
        self.opened
    }

    /// Number of `list_items` calls answered so far.
    pub fn list_calls(&self) -> usize {
        self.listed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl MailTransport for MemoryTransport {
    async fn open_folder(&mut self, target: &FolderTarget) -> Result<FolderRef> {
        self.opened += 1;
        let path = Self::folder_path(target);
        if !self.folders.contains_key(&path) {
            return Err(TransportError::FolderNotFound(path));
        }

        self.closed = false;
        Ok(FolderRef {
            path,
            store_id: self.store_id.clone(),
        })
    }

    async fn list_items(&mut self, folder: &FolderRef, query: &ItemQuery) -> Result<Vec<MailItem>> {
        let items = self
            .folders
            .get(&folder.path)
            .ok_or_else(|| TransportError::FolderNotFound(folder.path.clone()))?;

        let mut selected: Vec<MailItem> = items
            .iter()
            .filter(|item| !query.unread_only || item.unread)
            .filter(|item| match query.received_since {
                Some(since) => item.received_at.is_some_and(|at| at >= since),
                None => true,
            })
            .cloned()
            .map(|mut item| {
                if item.parent_store_id.is_none() {
                    item.parent_store_id = Some(folder.store_id.clone());
                }
                item
            })
            .collect();

        // Newest first; items without a receipt time go last
        selected.sort_by(|a, b| b.received_at.cmp(&a.received_at));

        self.listed += 1;
        Ok(selected)
    }

    async fn reply_template(&mut self, item: &MailItem) -> Result<ReplyDraft> {
        Ok(ReplyDraft::quoting(item))
    }

    async fn save_draft(&mut self, draft: ReplyDraft) -> Result<()> {
        if self.failing_drafts.contains(&draft.source_key) {
            return Err(TransportError::DraftFailed(format!(
                "draft store rejected reply to item {}",
                draft.source_key
            )));
        }

        self.drafts.push(draft);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
