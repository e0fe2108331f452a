use serde::Serialize;

/// The fixed set of areas the StreetEasy indices report on.
///
/// The source column names, short codes, and borough numbers are domain
/// constants; an area outside this set means the upstream layout changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    /// The all-boroughs aggregate. Carries no borough number.
    Citywide,
}

impl Borough {
    /// Maps a raw source column name to its canonical area.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Manhattan" => Some(Self::Manhattan),
            "Brooklyn" => Some(Self::Brooklyn),
            "Queens" => Some(Self::Queens),
            "NYC" => Some(Self::Citywide),
            _ => None,
        }
    }

    /// Short code used in the output CSV.
    pub fn code(self) -> &'static str {
        match self {
            Self::Manhattan => "MN",
            Self::Brooklyn => "BK",
            Self::Queens => "QN",
            Self::Citywide => "NYC",
        }
    }

    /// NYC borough number. The citywide aggregate has none.
    pub fn borocode(self) -> Option<u8> {
        match self {
            Self::Manhattan => Some(1),
            Self::Brooklyn => Some(3),
            Self::Queens => Some(4),
            Self::Citywide => None,
        }
    }

    /// Sort key placing numbered boroughs first and the aggregate last.
    pub fn sort_key(self) -> u16 {
        self.borocode().map(u16::from).unwrap_or(999)
    }
}

/// One (month, area) observation from a single index dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub year_month: String,
    pub borough: Borough,
    pub value: Option<f64>,
}

/// One row of the combined output CSV.
///
/// Field order matches the output column order. Absent metrics serialize
/// to empty fields, never `0`.
#[derive(Debug, PartialEq, Serialize)]
pub struct IndexRecord {
    pub year_month: String,
    pub borough: &'static str,
    pub borocode: Option<u8>,
    pub sales_index: Option<i64>,
    pub rental_index: Option<i64>,
}
