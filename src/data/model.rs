//! Record types shared by the pipeline stages.

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A `YYYY-MM` grouping key derived from a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid month bucket '{0}', expected YYYY-MM")]
pub struct ParseMonthError(String);

impl FromStr for MonthBucket {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Latitude / longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One cleaned row of the transaction table.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// 1-based data row in the source file, header excluded.
    pub row: usize,
    /// Trimmed order text as written in the file.
    pub order: String,
    /// Normalized join key.
    pub order_key: String,
    pub date: Option<NaiveDate>,
    pub amount_in: f64,
    pub amount_out: f64,
    pub volume_liters: f64,
    pub driver: Option<String>,
    pub vehicle_plate: Option<String>,
    /// Cleaned values of the configured extra currency columns present in
    /// the file, keyed by column name.
    pub extra_amounts: BTreeMap<String, f64>,
    /// Filled in by the join.
    pub location: Option<GeoPoint>,
}

impl TransactionRecord {
    /// Month bucket of `date`; absent exactly when the date is.
    pub fn month_bucket(&self) -> Option<MonthBucket> {
        self.date.map(MonthBucket::from_date)
    }

    pub fn is_geo_valid(&self) -> bool {
        self.location.is_some()
    }
}

/// One row of the location lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub row: usize,
    pub location_name: String,
    pub location_key: String,
    pub point: Option<GeoPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_bucket_formats_with_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(MonthBucket::from_date(date).to_string(), "2024-03");
    }

    #[test]
    fn month_bucket_parses_and_orders() {
        let jan: MonthBucket = "2024-01".parse().unwrap();
        let dec: MonthBucket = "2023-12".parse().unwrap();
        assert!(dec < jan);
        assert_eq!(jan, MonthBucket::new(2024, 1).unwrap());
    }

    #[test]
    fn month_bucket_rejects_bad_text() {
        assert!("2024-13".parse::<MonthBucket>().is_err());
        assert!("2024/01".parse::<MonthBucket>().is_err());
        assert!("24-01".parse::<MonthBucket>().is_err());
    }

    #[test]
    fn month_bucket_is_null_iff_date_is_null() {
        let mut record = TransactionRecord {
            row: 1,
            order: "Lokasi A".to_string(),
            order_key: "lokasi a".to_string(),
            date: None,
            amount_in: 0.0,
            amount_out: 0.0,
            volume_liters: 0.0,
            driver: None,
            vehicle_plate: None,
            extra_amounts: Default::default(),
            location: None,
        };
        assert!(record.month_bucket().is_none());

        record.date = NaiveDate::from_ymd_opt(2024, 2, 29);
        assert_eq!(record.month_bucket(), Some("2024-02".parse().unwrap()));
    }
}
