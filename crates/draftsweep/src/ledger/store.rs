//! Durable ledger file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::LedgerError;

use super::ProcessedLedger;

/// JSON file holding a [`ProcessedLedger`].
///
/// Not safe for two concurrent scans against the same file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the ledger. A missing file yields an empty ledger; unreadable or
    /// malformed content is an error and the file is left untouched.
    pub fn load(&self) -> Result<ProcessedLedger, LedgerError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "No ledger at {}, starting with an empty one",
                    self.path.display()
                );
                return Ok(ProcessedLedger::new());
            }
            Err(e) => {
                return Err(LedgerError::Read {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let ledger: ProcessedLedger =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| LedgerError::Parse {
                path: self.path.clone(),
                source: e,
            })?;

        debug!(
            "Loaded ledger from {} ({} handled across {} stores)",
            self.path.display(),
            ledger.len(),
            ledger.store_count()
        );
        Ok(ledger)
    }

    /// Replaces the file with the full ledger.
    ///
    /// Content goes to a sibling temporary file first and is renamed over the
    /// target, so readers see either the old or the new ledger.
    pub fn save(&self, ledger: &ProcessedLedger) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = write_json(&tmp_path, ledger) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.write_error(e));
        }

        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.write_error(e));
        }

        debug!(
            "Saved ledger to {} ({} handled)",
            self.path.display(),
            ledger.len()
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ledger".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    fn write_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

fn write_json(path: &Path, ledger: &ProcessedLedger) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, ledger)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}
