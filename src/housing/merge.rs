//! Full outer join of the sales and rentals long tables.

use std::collections::HashMap;

use tracing::debug;

use crate::housing::types::{Borough, IndexRecord, LongRow};

/// Joins the two long tables on (year_month, area) and sorts for output.
///
/// The join is a full outer join: a pair observed in only one dataset
/// still produces a record, with the other metric absent. The borough
/// number is recomputed from the area itself so one-sided pairs keep
/// theirs. Index values are truncated to whole numbers at this boundary.
///
/// Ordering: newest month first (the month key is fixed-width, so string
/// comparison is chronological), then borough number ascending with the
/// citywide aggregate last.
pub fn outer_join(sales: Vec<LongRow>, rentals: Vec<LongRow>) -> Vec<IndexRecord> {
    let mut merged: HashMap<(String, Borough), (Option<f64>, Option<f64>)> = HashMap::new();

    for row in sales {
        merged.entry((row.year_month, row.borough)).or_default().0 = row.value;
    }
    for row in rentals {
        merged.entry((row.year_month, row.borough)).or_default().1 = row.value;
    }

    let mut entries: Vec<_> = merged.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.sort_key().cmp(&b.1.sort_key()))
    });

    let records: Vec<IndexRecord> = entries
        .into_iter()
        .map(
            |((year_month, borough), (sales_index, rental_index))| IndexRecord {
                year_month,
                borough: borough.code(),
                borocode: borough.borocode(),
                sales_index: sales_index.map(|v| v as i64),
                rental_index: rental_index.map(|v| v as i64),
            },
        )
        .collect();

    debug!(records = records.len(), "Joined index tables");
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year_month: &str, borough: Borough, value: Option<f64>) -> LongRow {
        LongRow {
            year_month: year_month.to_string(),
            borough,
            value,
        }
    }

    #[test]
    fn test_pairs_present_on_both_sides_are_combined() {
        let sales = vec![row("2024-01", Borough::Manhattan, Some(104.7))];
        let rentals = vec![row("2024-01", Borough::Manhattan, Some(88.4))];

        let records = outer_join(sales, rentals);

        assert_eq!(
            records,
            [IndexRecord {
                year_month: "2024-01".into(),
                borough: "MN",
                borocode: Some(1),
                sales_index: Some(104),
                rental_index: Some(88),
            }]
        );
    }

    #[test]
    fn test_one_sided_pairs_survive_with_a_blank_metric() {
        let sales = vec![row("2024-01", Borough::Brooklyn, Some(99.2))];
        let rentals = vec![row("2023-11", Borough::Citywide, Some(90.9))];

        let records = outer_join(sales, rentals);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].year_month, "2024-01");
        assert_eq!(records[0].rental_index, None);
        assert_eq!(records[1].year_month, "2023-11");
        assert_eq!(records[1].sales_index, None);
        assert_eq!(records[1].borocode, None);
    }

    #[test]
    fn test_each_pair_appears_exactly_once() {
        let sales = vec![
            row("2024-01", Borough::Queens, Some(95.0)),
            row("2024-01", Borough::Queens, Some(96.0)),
        ];
        let rentals = vec![row("2024-01", Borough::Queens, Some(80.0))];

        let records = outer_join(sales, rentals);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sales_index, Some(96));
    }

    #[test]
    fn test_sorted_newest_month_first_then_borough_number() {
        let sales = vec![
            row("2023-12", Borough::Queens, Some(1.0)),
            row("2024-01", Borough::Citywide, Some(2.0)),
            row("2024-01", Borough::Brooklyn, Some(3.0)),
            row("2024-01", Borough::Manhattan, Some(4.0)),
        ];

        let records = outer_join(sales, vec![]);

        let order: Vec<_> = records
            .iter()
            .map(|r| (r.year_month.as_str(), r.borough))
            .collect();
        assert_eq!(
            order,
            [
                ("2024-01", "MN"),
                ("2024-01", "BK"),
                ("2024-01", "NYC"),
                ("2023-12", "QN"),
            ]
        );
    }

    #[test]
    fn test_values_truncate_toward_zero() {
        let sales = vec![row("2024-01", Borough::Manhattan, Some(104.9))];
        let rentals = vec![row("2024-01", Borough::Manhattan, Some(0.4))];

        let records = outer_join(sales, rentals);

        assert_eq!(records[0].sales_index, Some(104));
        assert_eq!(records[0].rental_index, Some(0));
    }

    #[test]
    fn test_missing_on_both_sides_stays_blank() {
        let sales = vec![row("2024-01", Borough::Manhattan, None)];

        let records = outer_join(sales, vec![]);

        assert_eq!(records[0].sales_index, None);
        assert_eq!(records[0].rental_index, None);
    }
}
