//! Dashboard Pipeline
//! Load -> normalize -> join runs once per upload (`prepare`); filter ->
//! aggregate runs once per month selection (`report`). Both are pure
//! functions of their arguments.

use crate::config::DashboardConfig;
use crate::data::{
    available_months, filter_by_months, join_locations, JoinStats, LoaderError, MonthBucket,
    NormalizeError, Normalizer, RawTable, TransactionRecord,
};
use crate::stats::{
    Aggregator, DriverSummary, FinancialSummary, GeoView, MonthlyRollup, MonthlyVolume,
    VehicleSummary,
};
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Which months the report covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthSelection {
    /// Every month present in the data (the initial selection).
    All,
    Only(BTreeSet<MonthBucket>),
}

impl MonthSelection {
    fn resolve(&self, prepared: &PreparedData) -> BTreeSet<MonthBucket> {
        match self {
            MonthSelection::All => prepared.available_months(),
            MonthSelection::Only(months) => months.clone(),
        }
    }
}

/// Cleaned, joined transactions ready for filtering.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub transactions: Vec<TransactionRecord>,
    pub join_stats: JoinStats,
    pub has_driver: bool,
    pub has_vehicle_plate: bool,
}

impl PreparedData {
    pub fn available_months(&self) -> BTreeSet<MonthBucket> {
        available_months(&self.transactions)
    }
}

/// All summaries for one run, handed to the charting layer or exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub selected_months: Vec<MonthBucket>,
    pub summary: FinancialSummary,
    pub monthly: Vec<MonthlyRollup>,
    pub monthly_volume: Vec<MonthlyVolume>,
    /// `None` when the transaction table has no driver column.
    pub drivers: Option<Vec<DriverSummary>>,
    /// `None` when the transaction table has no vehicle-plate column.
    pub vehicles: Option<Vec<VehicleSummary>>,
    pub map: GeoView,
    pub join: JoinStats,
}

pub struct Pipeline {
    config: DashboardConfig,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Normalize both tables and left-join coordinates onto transactions.
    pub fn prepare(
        &self,
        transactions: &RawTable,
        locations: &RawTable,
    ) -> Result<PreparedData, PipelineError> {
        let columns = &self.config.columns;
        let normalizer = Normalizer::new(columns);

        let records = normalizer.normalize_transactions(transactions)?;
        let location_records = normalizer.normalize_locations(locations)?;
        let (transactions_joined, join_stats) = join_locations(records, &location_records);

        Ok(PreparedData {
            transactions: transactions_joined,
            join_stats,
            has_driver: transactions.has_column(&columns.driver),
            has_vehicle_plate: transactions.has_column(&columns.vehicle_plate),
        })
    }

    /// Like [`Pipeline::prepare`], but a missing upload is the idle state
    /// (`Ok(None)`), not an error.
    pub fn try_prepare(
        &self,
        transactions: Option<&RawTable>,
        locations: Option<&RawTable>,
    ) -> Result<Option<PreparedData>, PipelineError> {
        match (transactions, locations) {
            (Some(transactions), Some(locations)) => self.prepare(transactions, locations).map(Some),
            _ => Ok(None),
        }
    }

    /// Filter to the selected months and compute every summary.
    pub fn report(&self, prepared: &PreparedData, selection: &MonthSelection) -> DashboardReport {
        let selected = selection.resolve(prepared);
        let rows = filter_by_months(&prepared.transactions, &selected);

        let report = DashboardReport {
            selected_months: selected.into_iter().collect(),
            summary: Aggregator::financial_summary(&rows),
            monthly: Aggregator::monthly_rollup(&rows),
            monthly_volume: Aggregator::monthly_volume(&rows),
            drivers: prepared
                .has_driver
                .then(|| Aggregator::driver_summary(&rows)),
            vehicles: prepared
                .has_vehicle_plate
                .then(|| Aggregator::vehicle_summary(&rows)),
            map: Aggregator::geo_view(&rows, &self.config.map),
            join: prepared.join_stats,
        };

        info!(
            months = report.selected_months.len(),
            rows = rows.len(),
            map_points = report.map.points.len(),
            "built dashboard report"
        );
        report
    }

    /// Full run from raw tables to report.
    pub fn run(
        &self,
        transactions: &RawTable,
        locations: &RawTable,
        selection: &MonthSelection,
    ) -> Result<DashboardReport, PipelineError> {
        let prepared = self.prepare(transactions, locations)?;
        Ok(self.report(&prepared, selection))
    }
}
