use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Phrasings that flag a message as a "rework will not help" notice.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"not expected to improve with rework",
    r"not expected to improve with (any )?rework",
    r"additional rework is not expected to improve",
];

/// Last-executed-verb code for "reply".
pub const VERB_REPLY: i64 = 102;
/// Last-executed-verb code for "reply all".
pub const VERB_REPLY_ALL: i64 = 103;

/// File name used when no platform data directory is available.
pub const FALLBACK_STATE_FILE: &str = ".email_agent_state.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default)]
    pub draft: DraftTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imap: Option<ImapSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSettings {
    /// Named mailbox (account root) holding `folder`. `None` scans the default inbox.
    #[serde(default)]
    pub mailbox: Option<String>,

    #[serde(default = "default_folder")]
    pub folder: String,

    /// Receipt-time window in days. `None` or `0` means unbounded.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: Option<u32>,

    #[serde(default = "default_true")]
    pub unread_only: bool,

    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,

    #[serde(default = "default_reply_verbs")]
    pub reply_verbs: Vec<i64>,

    #[serde(default = "default_reply_marker")]
    pub reply_marker: String,

    #[serde(default)]
    pub missing_identity: MissingIdentityPolicy,
}

fn default_folder() -> String {
    "Inbox".to_string()
}

fn default_lookback_days() -> Option<u32> {
    Some(1)
}

fn default_true() -> bool {
    true
}

fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
}

fn default_reply_verbs() -> Vec<i64> {
    vec![VERB_REPLY, VERB_REPLY_ALL]
}

fn default_reply_marker() -> String {
    "RE:".to_string()
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            mailbox: None,
            folder: default_folder(),
            lookback_days: default_lookback_days(),
            unread_only: true,
            patterns: default_patterns(),
            reply_verbs: default_reply_verbs(),
            reply_marker: default_reply_marker(),
            missing_identity: MissingIdentityPolicy::default(),
        }
    }
}

/// What to do with an item whose mailbox supplied no entry id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingIdentityPolicy {
    /// Reject the item. It will be looked at again on every run.
    #[default]
    Skip,
    /// Substitute a run-scoped identifier. The item may be drafted again on a later run.
    Synthesize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSettings {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    #[serde(default)]
    pub persist: PersistPolicy,
}

/// Platform data directory location for the ledger, or a file in the working
/// directory when the platform has none.
pub fn default_state_file() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("draftsweep").join("state.json"))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STATE_FILE))
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            persist: PersistPolicy::default(),
        }
    }
}

/// When the ledger is written back to disk during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistPolicy {
    /// After every drafted message, and once more at the end.
    #[default]
    PerItem,
    /// Once, after the scan loop completes.
    EndOfRun,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTemplate {
    /// First line of the generated paragraph. `{sender}` is replaced with the sender's display name.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_instruction")]
    pub instruction: String,

    /// Used for `{sender}` when the message has no sender display name.
    #[serde(default = "default_fallback_sender")]
    pub fallback_sender: String,
}

fn default_greeting() -> String {
    "Hi {sender},".to_string()
}

fn default_instruction() -> String {
    "Please comment and send lot on if rework is not expected to improve.".to_string()
}

fn default_fallback_sender() -> String {
    "there".to_string()
}

impl Default for DraftTemplate {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            instruction: default_instruction(),
            fallback_sender: default_fallback_sender(),
        }
    }
}

/// IMAP account used by the real mail transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImapSettings {
    /// IMAP server hostname (e.g., "imap.gmail.com").
    pub host: String,

    /// IMAP server port (default: 993 for IMAPS).
    #[serde(default = "default_imap_port")]
    pub port: u16,

    /// Whether to use TLS (required for security).
    #[serde(default = "default_true")]
    pub use_tls: bool,

    /// Login name (typically the email address).
    pub username: String,

    #[serde(default)]
    pub auth: ImapAuth,

    /// Folder receiving saved drafts.
    #[serde(default = "default_drafts_folder")]
    pub drafts_folder: String,

    /// Hierarchy delimiter joining a mailbox name and a folder name.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// From address written into drafts. Defaults to `username`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
}

fn default_imap_port() -> u16 {
    993
}

fn default_drafts_folder() -> String {
    "Drafts".to_string()
}

fn default_delimiter() -> String {
    "/".to_string()
}

impl ImapSettings {
    /// Store identifier for every message reached through this account.
    pub fn account_id(&self) -> String {
        format!("{}@{}", self.username, self.host)
    }

    pub fn from_address(&self) -> &str {
        self.from_address.as_deref().unwrap_or(&self.username)
    }
}

/// Password sources, tried in the order direct value, file, environment variable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImapAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env_var: Option<String>,

    /// WARNING: Storing passwords directly in config files is insecure.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "passwordInsecure",
        alias = "password"
    )]
    pub password_insecure: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_file: Option<String>,
}
