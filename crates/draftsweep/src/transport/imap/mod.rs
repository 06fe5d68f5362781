//! IMAP mail transport.

mod parse;
mod render;

use async_imap::types::Flag;
use async_imap::Session;
use async_native_tls::TlsConnector;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use log::{debug, info, warn};
use secrecy::ExposeSecret;

use crate::config::ImapSettings;
use crate::secrets::resolve_password;

use super::error::{Result, TransportError};
use super::{FolderRef, FolderTarget, ItemQuery, MailItem, MailTransport, ReplyDraft};

pub use parse::parse_mail_item;
pub use render::render_draft;

/// Type alias for the underlying async stream (using async-std compatible TcpStream).
type AsyncTcpStream = async_io::Async<std::net::TcpStream>;

/// Type alias for the TLS stream used by the IMAP session.
type TlsStream = async_native_tls::TlsStream<AsyncTcpStream>;

/// Flags stored on drafts appended to the drafts folder.
const DRAFT_FLAGS: &str = "(\\Draft \\Seen)";

/// Mail transport backed by an IMAP account.
///
/// Folders are opened read-only and bodies fetched with `BODY.PEEK[]`, so a
/// scan never changes the read state of a message.
pub struct ImapTransport {
    session: Option<Session<TlsStream>>,
    settings: ImapSettings,
    current_folder: Option<String>,
}

impl ImapTransport {
    pub fn new(settings: ImapSettings) -> Self {
        Self {
            session: None,
            settings,
            current_folder: None,
        }
    }

    /// Connects to the IMAP server and logs in. No-op when already connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.session.is_some() {
            debug!("Already connected to IMAP server");
            return Ok(());
        }

        if !self.settings.use_tls {
            return Err(TransportError::ConfigError(
                "TLS is required for secure email connections".to_string(),
            ));
        }

        let addr = format!("{}:{}", self.settings.host, self.settings.port);
        info!("Connecting to IMAP server at {}", addr);

        let std_stream = std::net::TcpStream::connect(&addr)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        std_stream
            .set_nonblocking(true)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        let tcp_stream = async_io::Async::new(std_stream)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        let tls_stream = TlsConnector::new()
            .connect(&self.settings.host, tcp_stream)
            .await?;

        let client = async_imap::Client::new(tls_stream);

        let password = resolve_password(&self.settings.auth)
            .map_err(|e| TransportError::CredentialsNotFound(e.to_string()))?;

        let session = client
            .login(&self.settings.username, password.expose_secret())
            .await
            .map_err(|(e, _)| TransportError::AuthenticationFailed(e.to_string()))?;

        info!("Successfully authenticated to IMAP server");
        self.session = Some(session);
        Ok(())
    }

    fn session(&mut self) -> Result<&mut Session<TlsStream>> {
        self.session
            .as_mut()
            .ok_or_else(|| TransportError::ConnectionFailed("Not connected".to_string()))
    }

    /// IMAP path of `target`.
    pub fn folder_path(&self, target: &FolderTarget) -> String {
        match target {
            FolderTarget::Inbox => "INBOX".to_string(),
            FolderTarget::Named { mailbox, folder } => {
                format!("{}{}{}", mailbox, self.settings.delimiter, folder)
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    async fn search(&mut self, query: &ItemQuery) -> Result<Vec<u32>> {
        let criteria = search_criteria(query);
        debug!("Searching with query: {}", criteria);

        let uids = self
            .session()?
            .uid_search(&criteria)
            .await
            .map_err(|e| TransportError::ProtocolError(e.to_string()))?;

        Ok(uids.into_iter().collect())
    }
}

/// A tagged `NO` to EXAMINE means the mailbox does not exist or cannot be selected.
fn examine_error(error: async_imap::error::Error, path: &str) -> TransportError {
    match error {
        async_imap::error::Error::No(text) => {
            debug!("EXAMINE {} refused: {}", path, text);
            TransportError::FolderNotFound(path.to_string())
        }
        other => TransportError::ProtocolError(other.to_string()),
    }
}

/// IMAP SEARCH criteria for `query`. SINCE has day granularity.
fn search_criteria(query: &ItemQuery) -> String {
    let mut criteria = Vec::new();
    if query.unread_only {
        criteria.push("UNSEEN".to_string());
    }
    if let Some(since) = query.received_since {
        criteria.push(format!("SINCE {}", since.format("%d-%b-%Y")));
    }
    if criteria.is_empty() {
        criteria.push("ALL".to_string());
    }
    criteria.join(" ")
}

#[async_trait]
impl MailTransport for ImapTransport {
    async fn open_folder(&mut self, target: &FolderTarget) -> Result<FolderRef> {
        self.connect().await?;

        let path = self.folder_path(target);
        info!("Examining folder: {}", path);

        let mailbox = self
            .session()?
            .examine(&path)
            .await
            .map_err(|e| examine_error(e, &path))?;

        debug!(
            "Folder '{}' opened ({} messages, UIDVALIDITY={:?})",
            path, mailbox.exists, mailbox.uid_validity
        );

        self.current_folder = Some(path.clone());
        Ok(FolderRef {
            path,
            store_id: self.settings.account_id(),
        })
    }

    async fn list_items(&mut self, folder: &FolderRef, query: &ItemQuery) -> Result<Vec<MailItem>> {
        if self.current_folder.as_deref() != Some(folder.path.as_str()) {
            return Err(TransportError::ProtocolError(format!(
                "Folder '{}' is not open",
                folder.path
            )));
        }

        let uids = self.search(query).await?;
        if uids.is_empty() {
            debug!("No messages matched in '{}'", folder.path);
            return Ok(Vec::new());
        }

        let uid_set = uids
            .iter()
            .map(|u| u.to_string())
            .collect::<Vec<_>>()
            .join(",");
        debug!("Fetching {} messages from '{}'", uids.len(), folder.path);

        let session = self.session()?;
        let mut fetched = Vec::new();
        {
            let mut messages = session
                .uid_fetch(&uid_set, "(UID FLAGS INTERNALDATE BODY.PEEK[])")
                .await
                .map_err(|e| TransportError::ProtocolError(e.to_string()))?;

            while let Some(message) = messages.next().await {
                match message {
                    Ok(message) => {
                        let (Some(uid), Some(body)) = (message.uid, message.body()) else {
                            warn!("Message missing UID or body");
                            continue;
                        };
                        let flags: Vec<Flag<'_>> = message.flags().collect();
                        let seen = flags.iter().any(|f| matches!(f, Flag::Seen));
                        let answered = flags.iter().any(|f| matches!(f, Flag::Answered));
                        let received_at: Option<DateTime<Utc>> =
                            message.internal_date().map(|d| d.with_timezone(&Utc));

                        match parse_mail_item(uid, body, &folder.store_id) {
                            Ok(mut item) => {
                                item.parent_store_id = Some(folder.store_id.clone());
                                item.unread = !seen;
                                item.replied = Some(answered);
                                if received_at.is_some() {
                                    item.received_at = received_at;
                                }
                                fetched.push(item);
                            }
                            Err(e) => warn!("Skipping UID {}: {}", uid, e),
                        }
                    }
                    Err(e) => warn!("Error fetching message: {}", e),
                }
            }
        }

        fetched.sort_by(|a, b| b.received_at.cmp(&a.received_at));
        debug!("Fetched {} messages", fetched.len());
        Ok(fetched)
    }

    async fn reply_template(&mut self, item: &MailItem) -> Result<ReplyDraft> {
        Ok(ReplyDraft::quoting(item))
    }

    async fn save_draft(&mut self, draft: ReplyDraft) -> Result<()> {
        let content = render_draft(&draft, self.settings.from_address())?;
        let drafts_folder = self.settings.drafts_folder.clone();

        self.session()?
            .append(&drafts_folder, Some(DRAFT_FLAGS), None, &content)
            .await
            .map_err(|e| TransportError::DraftFailed(e.to_string()))?;

        debug!("Appended draft to '{}'", drafts_folder);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut session) = self.session.take() {
            info!("Disconnecting from IMAP server");
            session
                .logout()
                .await
                .map_err(|e| TransportError::ProtocolError(e.to_string()))?;
        }
        self.current_folder = None;
        Ok(())
    }
}

impl Drop for ImapTransport {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!("ImapTransport dropped without explicit close - session will be closed");
        }
    }
}
