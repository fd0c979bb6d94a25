//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the converter starts
//! persisting chain transactions.

use std::path::Path;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that each of `areas` can be opened and counted.
///
/// Areas that do not exist yet are acceptable for a fresh environment. Read
/// failures are recorded in the report rather than causing a hard error.
pub fn check_integrity(env: &LmdbEnvironment, areas: &[&str]) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.env().read_txn()?;

    for &area in areas {
        match env
            .env()
            .open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(area))
        {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => {
                        report.total_entries += count;
                    }
                    Err(e) => {
                        report
                            .errors
                            .push(format!("failed to read area '{}': {}", area, e));
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open area '{}': {}", area, e));
            }
        }
    }

    if !report.is_healthy() {
        tracing::warn!(errors = report.errors.len(), "LMDB integrity check found problems");
    }
    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// A missing or empty directory is a fresh start. A non-empty directory
/// without `data.mdb` suggests corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), LmdbError> {
    if !path.exists() {
        return Ok(());
    }
    if path.join("data.mdb").exists() {
        return Ok(());
    }
    if std::fs::read_dir(path)?.next().is_none() {
        return Ok(());
    }
    Err(LmdbError::Heed(format!(
        "LMDB directory is not empty but data.mdb is missing at {}",
        path.display()
    )))
}
