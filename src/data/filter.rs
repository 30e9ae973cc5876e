//! Month filter over joined transactions.

use super::model::{MonthBucket, TransactionRecord};
use std::collections::BTreeSet;

/// Distinct months present in the table, ascending. Undated rows are skipped.
pub fn available_months(records: &[TransactionRecord]) -> BTreeSet<MonthBucket> {
    records.iter().filter_map(|r| r.month_bucket()).collect()
}

/// Rows whose month is in `selected`, in their original order. An empty
/// selection yields an empty table; undated rows never pass.
pub fn filter_by_months(
    records: &[TransactionRecord],
    selected: &BTreeSet<MonthBucket>,
) -> Vec<TransactionRecord> {
    records
        .iter()
        .filter(|r| r.month_bucket().is_some_and(|m| selected.contains(&m)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dated(row: usize, date: Option<(i32, u32, u32)>) -> TransactionRecord {
        TransactionRecord {
            row,
            order: String::new(),
            order_key: String::new(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            amount_in: 0.0,
            amount_out: 0.0,
            volume_liters: 0.0,
            driver: None,
            vehicle_plate: None,
            extra_amounts: Default::default(),
            location: None,
        }
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            dated(1, Some((2024, 2, 1))),
            dated(2, Some((2024, 1, 15))),
            dated(3, None),
            dated(4, Some((2024, 2, 20))),
        ]
    }

    #[test]
    fn test_available_months_sorted_and_distinct() {
        let months: Vec<String> = available_months(&sample())
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn test_full_selection_keeps_all_dated_rows() {
        let records = sample();
        let all = available_months(&records);
        let rows: Vec<usize> = filter_by_months(&records, &all).iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![1, 2, 4]);
    }

    #[test]
    fn test_empty_selection_is_empty() {
        assert!(filter_by_months(&sample(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_partial_selection() {
        let selected = BTreeSet::from(["2024-02".parse().unwrap()]);
        let rows: Vec<usize> = filter_by_months(&sample(), &selected)
            .iter()
            .map(|r| r.row)
            .collect();
        assert_eq!(rows, vec![1, 4]);
    }
}
