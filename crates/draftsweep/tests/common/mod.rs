//! Shared test utilities for draftsweep integration tests.

pub mod builders;
pub mod harness;
pub mod snapshot;

pub use builders::*;
pub use harness::ScanHarness;
pub use snapshot::LedgerSnapshotTransport;
