//! CSV output for both pipelines.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Writes all records to a fresh CSV file with a header row.
///
/// Records are fully materialized before this runs, so a pipeline that
/// fails partway never touches an existing output file. Parent
/// directories are created as needed; absent optional fields serialize to
/// empty fields.
pub fn write_records<T: Serialize>(path: &str, records: &[T]) -> Result<()> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    debug!(path, records = records.len(), "Writing CSV");
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("cannot write {path}"))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(path, rows = records.len(), "Saved output");
    Ok(())
}
