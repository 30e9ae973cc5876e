//! Report Export Module
//! Writes the dashboard report as JSON and the static charts as PNG files.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::pipeline::DashboardReport;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const CHART_SIZE: (u32, u32) = (1200, 700);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Handles exporting a report to disk.
pub struct ReportExporter;

impl ReportExporter {
    /// Write the report as pretty-printed JSON.
    pub fn export_json(report: &DashboardReport, output_path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(output_path)?);
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        info!(path = %output_path.display(), "exported report JSON");
        Ok(())
    }

    /// Render the finance, driver and fleet charts into `output_dir`.
    /// Driver and fleet charts are skipped when their table is absent or
    /// empty. Returns the files written.
    pub fn export_charts(
        report: &DashboardReport,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(output_dir)?;
        let mut written = Vec::new();

        let finance = output_dir.join("ringkasan_keuangan.png");
        StaticChartRenderer::render_finance_png(&report.summary, &finance, CHART_SIZE)?;
        written.push(finance);

        if let Some(drivers) = report.drivers.as_deref().filter(|d| !d.is_empty()) {
            let path = output_dir.join("kinerja_sopir.png");
            StaticChartRenderer::render_driver_png(drivers, &path, CHART_SIZE)?;
            written.push(path);
        }

        if let Some(vehicles) = report.vehicles.as_deref().filter(|v| !v.is_empty()) {
            let path = output_dir.join("penggunaan_armada.png");
            StaticChartRenderer::render_fleet_png(vehicles, &path, CHART_SIZE)?;
            written.push(path);
        }

        info!(dir = %output_dir.display(), charts = written.len(), "exported chart images");
        Ok(written)
    }
}
