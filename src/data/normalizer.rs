//! Data Normalizer Module
//! Coerces raw text cells into dates, amounts and volumes.

use super::loader::{LoaderError, RawTable, TableKind};
use super::model::{GeoPoint, LocationRecord, TransactionRecord};
use crate::config::ColumnConfig;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("Malformed number '{value}' in {table} table, row {row}, column '{column}'")]
    MalformedNumber {
        table: TableKind,
        row: usize,
        column: String,
        value: String,
    },
}

/// A non-blank cell that does not reduce to a number.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("not a number: '{0}'")]
pub struct MalformedValue(pub String);

// Month-first before day-first for slash and dash dates.
const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y%m%d",
];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Join-key normalization shared by both sides of the join.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse a calendar date. Ambiguous slash dates read month-first, so
/// `03/04/2024` is 4 March; `25/04/2024` falls through to day-first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Keep only the digits of a currency cell. Commas are thousands
/// separators and every other character is a symbol, space or dot.
pub fn strip_currency(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Clean a currency cell: blank is zero, text without digits is rejected.
pub fn clean_currency(raw: &str) -> Result<f64, MalformedValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }

    let digits = strip_currency(raw);
    if digits.is_empty() {
        return Err(MalformedValue(raw.to_string()));
    }
    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(MalformedValue(raw.to_string())),
    }
}

/// Parse a volume cell: blank is zero, anything else must be a finite,
/// non-negative number.
pub fn parse_volume(raw: &str) -> Result<f64, MalformedValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(MalformedValue(raw.to_string())),
    }
}

/// Parse one coordinate; blank means "no coordinate".
pub fn parse_coordinate(raw: &str, limit: f64) -> Result<Option<f64>, MalformedValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(Some(v)),
        _ => Err(MalformedValue(raw.to_string())),
    }
}

fn cell(values: &[Option<String>], row: usize) -> &str {
    values[row].as_deref().unwrap_or("")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Turns raw tables into typed records.
pub struct Normalizer<'a> {
    columns: &'a ColumnConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(columns: &'a ColumnConfig) -> Self {
        Self { columns }
    }

    fn malformed(table: &RawTable, row: usize, column: &str, err: MalformedValue) -> NormalizeError {
        NormalizeError::MalformedNumber {
            table: table.kind(),
            row: row + 1,
            column: column.to_string(),
            value: err.0,
        }
    }

    /// Normalize the transaction table. Unparsable dates become `None`;
    /// malformed amounts or volumes fail with the offending row and column.
    pub fn normalize_transactions(
        &self,
        table: &RawTable,
    ) -> Result<Vec<TransactionRecord>, NormalizeError> {
        let cols = self.columns;
        table.require_columns(&cols.required_transaction_columns())?;

        let orders = table.text_column(&cols.order)?;
        let dates = table.text_column(&cols.date)?;
        let incomes = table.text_column(&cols.income)?;
        let expenses = table.text_column(&cols.expense)?;
        let volumes = table.text_column(&cols.volume)?;
        let drivers = table.optional_text_column(&cols.driver)?;
        let plates = table.optional_text_column(&cols.vehicle_plate)?;

        let mut extras = Vec::new();
        for name in &cols.extra_currency {
            if let Some(values) = table.optional_text_column(name)? {
                extras.push((name.as_str(), values));
            }
        }

        let mut records = Vec::with_capacity(table.height());
        let mut undated = 0usize;

        for i in 0..table.height() {
            let date = parse_date(cell(&dates, i));
            if date.is_none() {
                undated += 1;
            }

            let amount_in = clean_currency(cell(&incomes, i))
                .map_err(|e| Self::malformed(table, i, &cols.income, e))?;
            let amount_out = clean_currency(cell(&expenses, i))
                .map_err(|e| Self::malformed(table, i, &cols.expense, e))?;
            let volume_liters = parse_volume(cell(&volumes, i))
                .map_err(|e| Self::malformed(table, i, &cols.volume, e))?;

            let mut extra_amounts = BTreeMap::new();
            for (name, values) in &extras {
                let amount = clean_currency(cell(values, i))
                    .map_err(|e| Self::malformed(table, i, name, e))?;
                extra_amounts.insert(name.to_string(), amount);
            }

            let order = cell(&orders, i).trim().to_string();
            records.push(TransactionRecord {
                row: i + 1,
                order_key: normalize_key(&order),
                order,
                date,
                amount_in,
                amount_out,
                volume_liters,
                driver: drivers.as_ref().and_then(|d| non_blank(d[i].as_deref())),
                vehicle_plate: plates.as_ref().and_then(|p| non_blank(p[i].as_deref())),
                extra_amounts,
                location: None,
            });
        }

        if undated > 0 {
            warn!(rows = undated, "transactions with unparsable dates excluded from monthly views");
        }
        info!(rows = records.len(), "normalized transactions");

        Ok(records)
    }

    /// Normalize the location lookup table.
    pub fn normalize_locations(
        &self,
        table: &RawTable,
    ) -> Result<Vec<LocationRecord>, NormalizeError> {
        let cols = self.columns;
        table.require_columns(&cols.required_location_columns())?;

        let names = table.text_column(&cols.location_name)?;
        let lats = table.text_column(&cols.latitude)?;
        let lons = table.text_column(&cols.longitude)?;

        let mut records = Vec::with_capacity(table.height());
        for i in 0..table.height() {
            let latitude = parse_coordinate(cell(&lats, i), 90.0)
                .map_err(|e| Self::malformed(table, i, &cols.latitude, e))?;
            let longitude = parse_coordinate(cell(&lons, i), 180.0)
                .map_err(|e| Self::malformed(table, i, &cols.longitude, e))?;

            let point = match (latitude, longitude) {
                (Some(latitude), Some(longitude)) => Some(GeoPoint {
                    latitude,
                    longitude,
                }),
                _ => None,
            };

            let location_name = cell(&names, i).trim().to_string();
            records.push(LocationRecord {
                row: i + 1,
                location_key: normalize_key(&location_name),
                location_name,
                point,
            });
        }

        info!(rows = records.len(), "normalized locations");
        Ok(records)
    }
}
