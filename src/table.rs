//! Wide-format tables shared by both pipelines.

/// A wide table: one header row naming the category columns, then one data
/// row per time period.
///
/// The first header cell labels the period column; every remaining cell is
/// a category name. Cells stay raw strings here, the reshapers own parsing
/// and validation. Data rows may be shorter than the header.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    /// Category column names, i.e. everything after the period column.
    pub fn categories(&self) -> &[String] {
        self.header.get(1..).unwrap_or_default()
    }
}
