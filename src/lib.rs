//! Tanker Dashboard - finance & delivery reporting for a refill-water
//! tanker business.
//!
//! Two CSV uploads (transactions and a location lookup) are cleaned, joined
//! on a normalized location name and summarized into the charts and map of
//! an egui dashboard.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod format;
pub mod gui;
pub mod pipeline;
pub mod stats;

pub use config::{ColumnConfig, DashboardConfig, MapConfig};
pub use pipeline::{DashboardReport, MonthSelection, Pipeline, PipelineError, PreparedData};
