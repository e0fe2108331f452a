//! Wide-to-long unpivot for a single index dataset.

use anyhow::{Result, bail};
use tracing::debug;

use crate::housing::types::{Borough, LongRow};
use crate::table::WideTable;

/// Unpivots a wide index table into one row per (month, area) pair.
///
/// The first column is the month key; every remaining column must be a
/// known area label. An unknown label means the upstream layout changed
/// and is an error, not a column to skip.
pub fn to_long(table: &WideTable) -> Result<Vec<LongRow>> {
    let mut boroughs = Vec::with_capacity(table.categories().len());
    for label in table.categories() {
        match Borough::from_label(label) {
            Some(borough) => boroughs.push(borough),
            None => bail!("unknown area column in index data: {label:?}"),
        }
    }

    let mut rows = Vec::with_capacity(table.rows.len() * boroughs.len());
    for record in &table.rows {
        let Some(year_month) = record.first() else {
            continue;
        };

        for (i, &borough) in boroughs.iter().enumerate() {
            let cell = record.get(i + 1).map(String::as_str).unwrap_or("");
            rows.push(LongRow {
                year_month: year_month.clone(),
                borough,
                value: parse_value(cell)?,
            });
        }
    }

    debug!(rows = rows.len(), "Unpivoted index table");
    Ok(rows)
}

/// Blank cells mean no observation; anything else must be numeric.
fn parse_value(cell: &str) -> Result<Option<f64>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => bail!("index value is not numeric: {trimmed:?}"),
    }
}
