//! Summary Aggregator Module
//! Grouped sums, counts and means over the filtered transactions.

use crate::config::MapConfig;
use crate::data::{GeoPoint, MonthBucket, TransactionRecord};
use chrono::NaiveDate;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Headline totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub order_count: usize,
    /// Totals of the extra currency columns, keyed by column name.
    pub other_totals: BTreeMap<String, f64>,
}

impl FinancialSummary {
    pub fn net(&self) -> f64 {
        self.total_income - self.total_expense
    }
}

/// Income and expense for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRollup {
    pub month: MonthBucket,
    pub income: f64,
    pub expense: f64,
}

/// Delivered volume for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyVolume {
    pub month: MonthBucket,
    pub volume_liters: f64,
}

/// Orders and volume handled by one driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSummary {
    pub driver: String,
    pub order_count: usize,
    pub total_volume: f64,
}

/// Usage of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSummary {
    pub vehicle_plate: String,
    pub trip_count: usize,
    pub total_expense: f64,
    pub mean_volume: f64,
}

/// Popup metadata shown for a map point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointPopup {
    pub name: String,
    pub volume_liters: f64,
    pub income: f64,
    pub date: Option<NaiveDate>,
}

/// One geo-valid delivery, weighted by volume for the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub point: GeoPoint,
    pub weight: f64,
    pub popup: PointPopup,
}

/// Everything the map needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub points: Vec<MapPoint>,
}

/// Title-case a location name for display: a letter is uppercased when it
/// follows a non-letter and lowercased otherwise ("lokasi-a" -> "Lokasi-A").
/// Whitespace is left as it is.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}

/// Pure aggregation functions over a filtered table.
pub struct Aggregator;

impl Aggregator {
    /// Total income, total expense, order count and extra column totals.
    pub fn financial_summary(records: &[TransactionRecord]) -> FinancialSummary {
        let mut other_totals: BTreeMap<String, f64> = BTreeMap::new();
        for record in records {
            for (column, amount) in &record.extra_amounts {
                *other_totals.entry(column.clone()).or_default() += *amount;
            }
        }

        FinancialSummary {
            total_income: records.iter().map(|r| r.amount_in).sum(),
            total_expense: records.iter().map(|r| r.amount_out).sum(),
            order_count: records.len(),
            other_totals,
        }
    }

    /// Income and expense per month, ascending by month.
    pub fn monthly_rollup(records: &[TransactionRecord]) -> Vec<MonthlyRollup> {
        let mut months: BTreeMap<MonthBucket, (f64, f64)> = BTreeMap::new();
        for record in records {
            if let Some(month) = record.month_bucket() {
                let entry = months.entry(month).or_default();
                entry.0 += record.amount_in;
                entry.1 += record.amount_out;
            }
        }

        months
            .into_iter()
            .map(|(month, (income, expense))| MonthlyRollup {
                month,
                income,
                expense,
            })
            .collect()
    }

    /// Volume per month, ascending by month.
    pub fn monthly_volume(records: &[TransactionRecord]) -> Vec<MonthlyVolume> {
        let mut months: BTreeMap<MonthBucket, f64> = BTreeMap::new();
        for record in records {
            if let Some(month) = record.month_bucket() {
                *months.entry(month).or_default() += record.volume_liters;
            }
        }

        months
            .into_iter()
            .map(|(month, volume_liters)| MonthlyVolume {
                month,
                volume_liters,
            })
            .collect()
    }

    /// Orders and volume per driver, busiest first. Ties keep name order.
    pub fn driver_summary(records: &[TransactionRecord]) -> Vec<DriverSummary> {
        let mut drivers: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for record in records {
            if let Some(driver) = record.driver.as_deref() {
                let entry = drivers.entry(driver).or_default();
                entry.0 += 1;
                entry.1 += record.volume_liters;
            }
        }

        let mut summary: Vec<DriverSummary> = drivers
            .into_iter()
            .map(|(driver, (order_count, total_volume))| DriverSummary {
                driver: driver.to_string(),
                order_count,
                total_volume,
            })
            .collect();
        // stable sort keeps the name order from the BTreeMap for equal counts
        summary.sort_by(|a, b| b.order_count.cmp(&a.order_count));
        summary
    }

    /// Trips, summed expense and mean volume per vehicle, ascending by plate.
    pub fn vehicle_summary(records: &[TransactionRecord]) -> Vec<VehicleSummary> {
        let mut vehicles: BTreeMap<&str, (f64, Vec<f64>)> = BTreeMap::new();
        for record in records {
            if let Some(plate) = record.vehicle_plate.as_deref() {
                let entry = vehicles.entry(plate).or_default();
                entry.0 += record.amount_out;
                entry.1.push(record.volume_liters);
            }
        }

        vehicles
            .into_iter()
            .map(|(plate, (total_expense, volumes))| VehicleSummary {
                vehicle_plate: plate.to_string(),
                trip_count: volumes.len(),
                total_expense,
                mean_volume: volumes.iter().mean(),
            })
            .collect()
    }

    /// Geo-valid rows as weighted map points, centered on their mean
    /// position or on the configured fallback when there are none.
    pub fn geo_view(records: &[TransactionRecord], map: &MapConfig) -> GeoView {
        let points: Vec<MapPoint> = records
            .iter()
            .filter_map(|record| {
                record.location.map(|point| MapPoint {
                    point,
                    weight: record.volume_liters,
                    popup: PointPopup {
                        name: title_case(&record.order_key),
                        volume_liters: record.volume_liters,
                        income: record.amount_in,
                        date: record.date,
                    },
                })
            })
            .collect();

        let center = if points.is_empty() {
            let (latitude, longitude) = map.fallback_center;
            GeoPoint {
                latitude,
                longitude,
            }
        } else {
            GeoPoint {
                latitude: points.iter().map(|p| p.point.latitude).mean(),
                longitude: points.iter().map(|p| p.point.longitude).mean(),
            }
        };

        GeoView {
            center,
            zoom: map.zoom,
            points,
        }
    }
}
