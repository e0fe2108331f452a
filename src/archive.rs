//! ZIP reading for the housing index datasets.
//!
//! StreetEasy publishes each index as a ZIP archive holding a single wide
//! CSV; only the first entry is ever read.

use std::io::{Cursor, Read};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::table::WideTable;

/// Opens ZIP bytes and parses the first entry as a headered CSV.
///
/// # Errors
///
/// Returns an error if the bytes are not a ZIP archive, the archive has no
/// entries, or the entry is not UTF-8 CSV with a header row.
pub fn read_first_csv(bytes: &[u8]) -> Result<WideTable> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("not a readable ZIP archive")?;

    if archive.len() == 0 {
        bail!("archive contains no entries");
    }

    let mut entry = archive.by_index(0)?;
    let name = entry.name().to_string();
    debug!(entry = %name, "Reading archive entry");

    let mut contents = String::new();
    entry
        .read_to_string(&mut contents)
        .with_context(|| format!("archive entry {name} is not UTF-8 text"))?;

    parse_csv(&contents)
}

fn parse_csv(contents: &str) -> Result<WideTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(contents.as_bytes());

    let header = reader
        .headers()
        .context("CSV entry has no header row")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed CSV row")?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(WideTable { header, rows })
}
