pub mod config;
pub mod draft;
pub mod error;
pub mod filter;
pub mod identity;
pub mod ledger;
pub mod logging;
pub mod matcher;
pub mod sanitize;
pub mod scan;
pub mod secrets;
pub mod transport;

pub use config::{load_config, load_config_or_default, Config};
pub use draft::DraftComposer;
pub use error::{ConfigError, DraftsweepError, LedgerError, Result};
pub use filter::{EligibilityFilter, Rejection, Verdict};
pub use identity::MessageIdentity;
pub use ledger::{LedgerStore, ProcessedLedger};
pub use logging::{init_logging, LogFormat, LoggingError};
pub use scan::{scan_and_draft, ScanReport, Scanner};
pub use secrets::{resolve_secret, SecretError};
pub use transport::{ImapTransport, MailTransport, MemoryTransport, TransportError};
