use std::collections::BTreeMap;
use std::fmt;

use crate::filter::Rejection;

/// Outcome of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Items yielded by the folder enumeration.
    pub examined: usize,
    /// Drafts created and marked in the ledger.
    pub drafted: usize,
    /// Eligible items whose draft could not be created. Left unmarked.
    pub failed: usize,
    pub skipped: BTreeMap<Rejection, usize>,
}

impl ScanReport {
    pub fn record_skip(&mut self, reason: Rejection) {
        *self.skipped.entry(reason).or_default() += 1;
    }

    pub fn skipped_for(&self, reason: Rejection) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "examined={} drafted={} failed={} skipped={}",
            self.examined,
            self.drafted,
            self.failed,
            self.total_skipped()
        )?;
        for (reason, count) in &self.skipped {
            write!(f, " {}={}", reason, count)?;
        }
        Ok(())
    }
}
