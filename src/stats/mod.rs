//! Stats module - Dashboard aggregations

mod aggregator;

pub use aggregator::{
    title_case, Aggregator, DriverSummary, FinancialSummary, GeoView, MapPoint, MonthlyRollup,
    MonthlyVolume, PointPopup, VehicleSummary,
};
