//! Read/write the persisted survey snapshot.
//!
//! The snapshot is the provider's `value` array written verbatim (pretty-printed).
//! It is the hand-off between the fetch stage and the analysis stage.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde_json::Value;

use crate::domain::SurveyRecord;
use crate::error::AppError;

/// Write the raw records to `path`.
///
/// Each record keeps the provider's key order. The JSON is serialized in memory
/// and written to a sibling temp file that is then renamed into place, so a
/// failure never leaves a partial snapshot.
pub fn write_snapshot(path: &Path, records: &[Value]) -> Result<(), AppError> {
    let body = serde_json::to_string_pretty(records)
        .map_err(|e| AppError::io(format!("Failed to serialize snapshot: {e}")))?;

    write_via_temp(path, |tmp| fs::write(tmp, &body))?;

    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Run `write` against `<path>.tmp`, then rename it onto `path`.
///
/// The temp file is removed if either step fails.
fn write_via_temp(path: &Path, write: impl FnOnce(&Path) -> io::Result<()>) -> Result<(), AppError> {
    let tmp = temp_path(path);
    write(&tmp).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::io(format!("Failed to write snapshot '{}': {e}", tmp.display()))
    })?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::io(format!("Failed to move snapshot into '{}': {e}", path.display()))
    })
}

/// Read a snapshot file into typed survey records.
pub fn read_records(path: &Path) -> Result<Vec<SurveyRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open snapshot '{}': {e}", path.display())))?;
    let records: Vec<SurveyRecord> = serde_json::from_reader(file)
        .map_err(|e| AppError::data(format!("Invalid snapshot JSON '{}': {e}", path.display())))?;
    info!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
