//! Monthly-ledger persistence for finished sessions.
//!
//! The workbook is one JSON document: a map from `YYYY-MM` section name to
//! the ordered rows of that month. Appending reads the whole workbook,
//! extends one section and commits the result through a temp-file rename, so
//! a crash mid-write leaves the previous workbook intact.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use log::{info, warn};
use thiserror::Error;

use crate::models::SessionRecord;

/// Default workbook file name, next to wherever the host app keeps its data.
pub const DEFAULT_WORKBOOK: &str = "time_tracking.json";

type Workbook = BTreeMap<String, Vec<SessionRecord>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to {action} workbook {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The existing workbook does not parse as the expected ledger schema.
    /// It is reported rather than overwritten.
    #[error("workbook {} does not match the expected ledger schema", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode workbook {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Append-only store of session records, grouped by calendar month.
///
/// Holds no open file handle; every call re-reads the workbook, so a store
/// reopened on a later run extends the correct month instead of duplicating
/// it. Not safe for concurrent writers to the same path; callers keep at
/// most one append in flight.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Appends one record to its month's ledger, creating the workbook or
    /// the month section as needed. All other sections are carried over
    /// unchanged. On error nothing is written and the caller may retry with
    /// the same record.
    pub fn append(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let key = record.ledger_key();
        let mut workbook = self.load()?;
        let ledger = workbook.entry(key.clone()).or_default();
        ledger.push(record.clone());
        let rows = ledger.len();
        self.commit(&workbook)?;
        info!(
            "Recorded session under {key} ({rows} rows) in {}",
            self.path.display()
        );
        Ok(())
    }

    /// Ordered records of one month, empty if that section does not exist.
    pub fn month(&self, key: &str) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.load()?.remove(key).unwrap_or_default())
    }

    /// Section names present in the workbook, in chronological order.
    pub fn months(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load()?.into_keys().collect())
    }

    fn load(&self) -> Result<Workbook, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Workbook::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    action: "read",
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn commit(&self, workbook: &Workbook) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                action: "create the directory for",
                path: self.path.clone(),
                source,
            })?;
        }

        let bytes = serde_json::to_vec_pretty(workbook).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        // Staged as a sibling so the rename never crosses filesystems.
        let staged = self.staging_path();
        fs::write(&staged, &bytes).map_err(|source| StoreError::Io {
            action: "stage",
            path: staged.clone(),
            source,
        })?;

        fs::rename(&staged, &self.path).map_err(|source| {
            if let Err(cleanup) = fs::remove_file(&staged) {
                warn!(
                    "Failed to remove staged workbook {}: {cleanup}",
                    staged.display()
                );
            }
            StoreError::Io {
                action: "replace",
                path: self.path.clone(),
                source,
            }
        })
    }

    fn staging_path(&self) -> PathBuf {
        let mut raw = self.path.clone().into_os_string();
        raw.push(".tmp");
        PathBuf::from(raw)
    }
}
