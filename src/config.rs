//! Dashboard Configuration
//! Column names and map defaults passed explicitly into the pipeline.

use serde::{Deserialize, Serialize};

/// Header names expected in the two uploaded CSV files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub order: String,
    pub date: String,
    pub income: String,
    pub expense: String,
    pub volume: String,
    pub driver: String,
    pub vehicle_plate: String,
    pub location_name: String,
    pub latitude: String,
    pub longitude: String,
    /// Optional monetary columns cleaned like income and expense when the
    /// transaction table carries them.
    pub extra_currency: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            order: "Order".to_string(),
            date: "Tanggal".to_string(),
            income: "Pemasukan".to_string(),
            expense: "Pengeluaran".to_string(),
            volume: "Volume (L)".to_string(),
            driver: "Sopir".to_string(),
            vehicle_plate: "Plat Nomor".to_string(),
            location_name: "Nama Lokasi".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
            extra_currency: vec!["Jumlah".to_string()],
        }
    }
}

impl ColumnConfig {
    /// Columns the transaction table must carry.
    pub fn required_transaction_columns(&self) -> [&str; 5] {
        [
            self.order.as_str(),
            self.date.as_str(),
            self.income.as_str(),
            self.expense.as_str(),
            self.volume.as_str(),
        ]
    }

    /// Columns the location table must carry.
    pub fn required_location_columns(&self) -> [&str; 3] {
        [self.location_name.as_str(), self.latitude.as_str(), self.longitude.as_str()]
    }
}

/// Map rendering defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Center used when no row has coordinates (Yogyakarta).
    pub fallback_center: (f64, f64),
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            fallback_center: (-7.8, 110.4),
            zoom: 11,
        }
    }
}

/// Everything the pipeline needs besides the two input tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub columns: ColumnConfig,
    pub map: MapConfig,
}
