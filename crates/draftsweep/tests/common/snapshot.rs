//! Transport wrapper that records the ledger file as each draft is saved.

#![allow(dead_code)]

use std::path::PathBuf;

use async_trait::async_trait;

use draftsweep::transport::{
    FolderRef, FolderTarget, ItemQuery, MailItem, MailTransport, MemoryTransport, ReplyDraft,
    Result,
};

pub struct LedgerSnapshotTransport {
    pub inner: MemoryTransport,
    state_file: PathBuf,
    /// Ledger file content at the start of each `save_draft`, `None` when absent.
    pub snapshots: Vec<Option<String>>,
}

impl LedgerSnapshotTransport {
    pub fn new(inner: MemoryTransport, state_file: PathBuf) -> Self {
        Self {
            inner,
            state_file,
            snapshots: Vec::new(),
        }
    }
}

#[async_trait]
impl MailTransport for LedgerSnapshotTransport {
    async fn open_folder(&mut self, target: &FolderTarget) -> Result<FolderRef> {
        self.inner.open_folder(target).await
    }

    async fn list_items(&mut self, folder: &FolderRef, query: &ItemQuery) -> Result<Vec<MailItem>> {
        self.inner.list_items(folder, query).await
    }

    async fn reply_template(&mut self, item: &MailItem) -> Result<ReplyDraft> {
        self.inner.reply_template(item).await
    }

    async fn save_draft(&mut self, draft: ReplyDraft) -> Result<()> {
        self.snapshots.push(std::fs::read_to_string(&self.state_file).ok());
        self.inner.save_draft(draft).await
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }
}
