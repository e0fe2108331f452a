use chrono::NaiveDate;
use serde::Serialize;

/// Series identifier the downstream dashboard uses for the Times Square
/// pedestrian counter.
pub const SPID: u32 = 35;

/// Reference counts for the twelve months ending February 2020, keyed by
/// calendar month. Index 0 is January.
pub const MONTHLY_BASELINE: [u64; 12] = [
    9_604_733,  // January
    9_136_148,  // February
    10_918_554, // March
    11_204_332, // April
    11_642_886, // May
    11_389_867, // June
    11_802_421, // July
    11_918_009, // August
    11_123_744, // September
    11_585_622, // October
    11_247_951, // November
    12_387_290, // December
];

/// Returns the reference count for a calendar month (1-12), if known.
pub fn baseline_for_month(month: u32) -> Option<u64> {
    (month as usize)
        .checked_sub(1)
        .and_then(|i| MONTHLY_BASELINE.get(i))
        .copied()
}

/// One parsed (month, count) cell from the wide counts table. `month` is
/// the first day of the observed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub month: NaiveDate,
    pub count: i64,
}

/// Output row for the plain counts schema.
#[derive(Debug, PartialEq, Serialize)]
pub struct CountRecord {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Count")]
    pub count: i64,
}

/// Output row for the baseline-comparison schema.
///
/// `baseline_pct` is absent exactly when the month's reference count is
/// unknown or zero; the CSV layer renders that as a blank field.
#[derive(Debug, PartialEq, Serialize)]
pub struct BaselineRecord {
    #[serde(rename = "date.1")]
    pub date: String,
    #[serde(rename = "Value")]
    pub value: i64,
    #[serde(rename = "SPID")]
    pub spid: u32,
    #[serde(rename = "PseudoBaseline")]
    pub baseline: u64,
    #[serde(rename = "Baseline Perc Chg")]
    pub baseline_pct: Option<f64>,
}
