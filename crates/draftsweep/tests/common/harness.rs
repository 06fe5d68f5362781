//! Test harness for isolated scan execution.
//!
//! Each harness owns a temporary directory for the ledger file and an
//! in-memory mailbox, so tests never touch a real account or the user's
//! data directory.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use draftsweep::config::{Config, PersistPolicy};
use draftsweep::ledger::{LedgerStore, ProcessedLedger};
use draftsweep::transport::{MailItem, MailTransport, MemoryTransport};
use draftsweep::{Result, ScanReport, Scanner};

use super::builders::{now, STORE};

pub struct ScanHarness {
    temp_dir: TempDir,
    pub state_file: PathBuf,
    pub config: Config,
    pub transport: MemoryTransport,
}

impl ScanHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let state_file = temp_dir.path().join("state").join("ledger.json");

        let mut config = Config::default();
        config.ledger.state_file = state_file.clone();

        Self {
            temp_dir,
            state_file,
            config,
            transport: MemoryTransport::new(STORE),
        }
    }

    pub fn with_persist(mut self, persist: PersistPolicy) -> Self {
        self.config.ledger.persist = persist;
        self
    }

    pub fn deliver(&mut self, item: MailItem) -> &mut Self {
        self.transport.deliver(item);
        self
    }

    /// Runs one scan at the fixed reference time.
    pub async fn scan(&mut self) -> Result<ScanReport> {
        let scanner = Scanner::from_config(&self.config)?;
        scanner.scan_at(&mut self.transport, now()).await
    }

    /// Runs one scan against `transport` instead of the harness mailbox.
    pub async fn scan_with(&self, transport: &mut dyn MailTransport) -> Result<ScanReport> {
        let scanner = Scanner::from_config(&self.config)?;
        scanner.scan_at(transport, now()).await
    }

    /// Hands the harness mailbox to the caller, leaving an empty one behind.
    pub fn take_transport(&mut self) -> MemoryTransport {
        std::mem::replace(&mut self.transport, MemoryTransport::new(STORE))
    }

    /// Reads the ledger back from disk.
    pub fn ledger(&self) -> ProcessedLedger {
        LedgerStore::new(&self.state_file)
            .load()
            .expect("Failed to load ledger")
    }

    pub fn write_state(&self, content: &str) {
        if let Some(parent) = self.state_file.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create state dir");
        }
        std::fs::write(&self.state_file, content).expect("Failed to write state file");
    }

    pub fn drafts_for(&self, local_key: u64) -> usize {
        self.transport
            .drafts()
            .iter()
            .filter(|draft| draft.source_key == local_key)
            .count()
    }
}

impl Default for ScanHarness {
    fn default() -> Self {
        Self::new()
    }
}
