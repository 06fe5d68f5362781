//! Scan orchestration: enumerate, filter, draft, mark.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::{Config, PersistPolicy, ScanSettings};
use crate::draft::DraftComposer;
use crate::error::{ConfigError, Result};
use crate::filter::{EligibilityFilter, Verdict};
use crate::identity;
use crate::ledger::{LedgerStore, ProcessedLedger};
use crate::sanitize::{redact_address, redact_identity};
use crate::transport::{FolderTarget, ItemQuery, MailTransport};

use super::report::ScanReport;

/// Drives one scan of a folder.
///
/// Each eligible message is drafted and then marked in the ledger. A message
/// whose draft fails stays unmarked and is picked up again by the next run.
pub struct Scanner {
    settings: ScanSettings,
    filter: EligibilityFilter,
    composer: DraftComposer,
    store: LedgerStore,
    persist: PersistPolicy,
}

impl Scanner {
    /// Compiles the configured patterns. Fails before any mailbox access when
    /// one is malformed.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        Ok(Self {
            settings: config.scan.clone(),
            filter: EligibilityFilter::from_settings(&config.scan)?,
            composer: DraftComposer::new(config.draft.clone()),
            store: LedgerStore::new(&config.ledger.state_file),
            persist: config.ledger.persist,
        })
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub async fn scan(&self, transport: &mut dyn MailTransport) -> Result<ScanReport> {
        self.scan_at(transport, Utc::now()).await
    }

    /// Scans with `now` as the reference time for the lookback window.
    pub async fn scan_at(
        &self,
        transport: &mut dyn MailTransport,
        now: DateTime<Utc>,
    ) -> Result<ScanReport> {
        let span = info_span!(
            "email_scan",
            mailbox = self.settings.mailbox.as_deref().unwrap_or("default"),
            folder = %self.settings.folder,
        );
        self.scan_session(transport, now).instrument(span).await
    }

    async fn scan_session(
        &self,
        transport: &mut dyn MailTransport,
        now: DateTime<Utc>,
    ) -> Result<ScanReport> {
        // A corrupt ledger aborts before the mailbox is touched
        let mut ledger = self.store.load()?;

        let result = self.run(transport, &mut ledger, now).await;

        if let Err(e) = transport.close().await {
            warn!(error = %e, "Failed to close mail session");
        }

        match &result {
            Ok(report) => info!(%report, "Scan complete"),
            Err(e) => error!(error = %e, "Scan aborted"),
        }
        result
    }

    async fn run(
        &self,
        transport: &mut dyn MailTransport,
        ledger: &mut ProcessedLedger,
        now: DateTime<Utc>,
    ) -> Result<ScanReport> {
        let target = FolderTarget::from_names(self.settings.mailbox.as_deref(), &self.settings.folder);
        let folder = transport.open_folder(&target).await?;

        let query = self.query(now);
        let items = transport.list_items(&folder, &query).await?;
        info!(
            candidates = items.len(),
            unread_only = query.unread_only,
            since = ?query.received_since,
            "Enumerated folder '{}'",
            folder.path
        );

        let mut report = ScanReport::default();
        for item in &items {
            report.examined += 1;
            let identity = identity::resolve(item);

            if let Verdict::Rejected(reason) = self.filter.evaluate(item, &identity, ledger) {
                debug!(message = %redact_identity(&identity), %reason, "Skipping message");
                report.record_skip(reason);
                continue;
            }

            if let Err(e) = self.composer.compose(transport, item).await {
                error!(
                    message = %redact_identity(&identity),
                    error = %e,
                    "Failed to create draft, message left for the next run"
                );
                report.failed += 1;
                continue;
            }

            ledger.mark(&identity);
            report.drafted += 1;
            info!(
                message = %redact_identity(&identity),
                sender = %item.sender_address.as_deref().map(redact_address).unwrap_or_default(),
                pattern = item
                    .body
                    .as_deref()
                    .and_then(|body| self.filter.patterns().first_match(body))
                    .unwrap_or_default(),
                "Drafted reply"
            );

            if self.persist == PersistPolicy::PerItem {
                self.store.save(ledger)?;
            }
        }

        self.store.save(ledger)?;
        Ok(report)
    }

    /// A window reaching past the earliest representable time is unbounded.
    fn query(&self, now: DateTime<Utc>) -> ItemQuery {
        ItemQuery {
            unread_only: self.settings.unread_only,
            received_since: self
                .settings
                .lookback_days
                .filter(|days| *days > 0)
                .and_then(|days| TimeDelta::try_days(i64::from(days)))
                .and_then(|window| now.checked_sub_signed(window)),
        }
    }
}

/// Runs one scan with `config` and returns the number of drafts created.
pub async fn scan_and_draft(config: &Config, transport: &mut dyn MailTransport) -> Result<usize> {
    let scanner = Scanner::from_config(config)?;
    Ok(scanner.scan(transport).await?.drafted)
}
