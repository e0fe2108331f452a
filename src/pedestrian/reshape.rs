//! Wide-to-long reshape and baseline metric for the pedestrian counts.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::pedestrian::types::{BaselineRecord, CountRecord, Observation, SPID, baseline_for_month};
use crate::table::WideTable;

/// Maps a spelled-out month name to its calendar number.
pub fn month_number(name: &str) -> Option<u32> {
    match name {
        "January" => Some(1),
        "February" => Some(2),
        "March" => Some(3),
        "April" => Some(4),
        "May" => Some(5),
        "June" => Some(6),
        "July" => Some(7),
        "August" => Some(8),
        "September" => Some(9),
        "October" => Some(10),
        "November" => Some(11),
        "December" => Some(12),
        _ => None,
    }
}

/// Unpivots the counts table into one observation per (year, month) cell.
///
/// Header cells after the first are year labels. Rows whose first cell is
/// not a month name are skipped, the table mixes count rows with totals
/// and annotations. Blank cells are skipped; a non-numeric count or year
/// label is an error.
pub fn observations(table: &WideTable) -> Result<Vec<Observation>> {
    let years = table
        .categories()
        .iter()
        .map(|label| {
            label
                .trim()
                .parse::<i32>()
                .with_context(|| format!("year column label is not numeric: {label:?}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut observations = Vec::new();
    for row in &table.rows {
        let Some(first) = row.first() else {
            continue;
        };
        let Some(month) = month_number(first) else {
            debug!(label = %first, "Skipping non-month row");
            continue;
        };

        for (i, &year) in years.iter().enumerate() {
            let Some(cell) = row.get(i + 1) else {
                continue;
            };
            let cleaned = cell.replace([',', ' '], "");
            if cleaned.is_empty() {
                continue;
            }

            let count = cleaned
                .parse::<i64>()
                .with_context(|| format!("count cell is not numeric: {cell:?}"))?;
            let month = NaiveDate::from_ymd_opt(year, month, 1)
                .with_context(|| format!("invalid observation month: {year}-{month}"))?;

            observations.push(Observation { month, count });
        }
    }

    debug!(observations = observations.len(), "Unpivoted counts table");
    Ok(observations)
}

/// Formats observations for the plain `Month,Count` schema, newest first.
pub fn count_records(mut observations: Vec<Observation>) -> Vec<CountRecord> {
    observations.sort_by(|a, b| b.month.cmp(&a.month));

    observations
        .into_iter()
        .map(|o| CountRecord {
            month: o.month.format("%Y%m").to_string(),
            count: o.count,
        })
        .collect()
}

/// Derives the baseline-comparison schema, newest first.
///
/// The baseline is keyed by calendar month alone, so observations from
/// different years compare against the same reference count.
pub fn baseline_records(mut observations: Vec<Observation>) -> Vec<BaselineRecord> {
    observations.sort_by(|a, b| b.month.cmp(&a.month));

    observations
        .into_iter()
        .map(|o| {
            let baseline = baseline_for_month(o.month.month()).unwrap_or(0);
            BaselineRecord {
                date: format!("{}/1/{}", o.month.month(), o.month.year()),
                value: o.count,
                spid: SPID,
                baseline,
                baseline_pct: percent_of_baseline(o.count, baseline),
            }
        })
        .collect()
}

/// Ratio of an observed count to its reference count, rounded to four
/// decimal places. Unknown or zero baselines yield no ratio.
pub fn percent_of_baseline(value: i64, baseline: u64) -> Option<f64> {
    if baseline == 0 {
        return None;
    }
    Some(round4(value as f64 / baseline as f64))
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
