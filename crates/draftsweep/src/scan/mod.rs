pub mod report;
pub mod scanner;

pub use report::ScanReport;
pub use scanner::{scan_and_draft, Scanner};
