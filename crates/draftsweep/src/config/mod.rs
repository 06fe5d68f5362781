pub mod loader;
pub mod schema;

pub use loader::{
    default_config_path, load_config, load_config_from_str, load_config_or_default,
    validate_config,
};
pub use schema::{
    default_state_file, Config, DraftTemplate, ImapAuth, ImapSettings, LedgerSettings,
    MissingIdentityPolicy, PersistPolicy, ScanSettings, DEFAULT_PATTERNS, VERB_REPLY,
    VERB_REPLY_ALL,
};
