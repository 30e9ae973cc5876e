//! Tanker Dashboard Main Application
//! Main window with control panel and dashboard viewer. Every interaction
//! re-runs the pipeline synchronously on the UI thread.

use crate::data::{DataLoader, RawTable, TableKind};
use crate::export::ReportExporter;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{MonthSelection, Pipeline, PreparedData};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info};

/// Main application window.
pub struct DashboardApp {
    pipeline: Pipeline,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    transactions: Option<RawTable>,
    locations: Option<RawTable>,
    prepared: Option<PreparedData>,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, pipeline: Pipeline) -> Self {
        Self::with_pipeline(pipeline)
    }

    fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            transactions: None,
            locations: None,
            prepared: None,
        }
    }

    fn table_slot(&mut self, kind: TableKind) -> &mut Option<RawTable> {
        match kind {
            TableKind::Transactions => &mut self.transactions,
            TableKind::Locations => &mut self.locations,
        }
    }

    /// Handle CSV file selection for one of the two uploads.
    fn handle_browse_csv(&mut self, kind: TableKind) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };
        self.load_upload(kind, path);
    }

    /// Load one upload. The panel only shows the file name once the table
    /// is actually held.
    fn load_upload(&mut self, kind: TableKind, path: PathBuf) {
        match DataLoader::load_csv(&path, kind) {
            Ok(table) => {
                *self.control_panel.settings.path_mut(kind) = Some(path);
                *self.table_slot(kind) = Some(table);
                self.rerun_prepare();
            }
            Err(e) => {
                error!(path = %path.display(), "failed to load CSV: {e}");
                *self.control_panel.settings.path_mut(kind) = None;
                *self.table_slot(kind) = None;
                self.reset_results();
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    fn reset_results(&mut self) {
        self.prepared = None;
        self.chart_viewer.clear();
        self.control_panel.clear_months();
        self.control_panel.export_enabled = false;
    }

    /// Clean and join both uploads, then rebuild the report with every
    /// month selected.
    fn rerun_prepare(&mut self) {
        match self
            .pipeline
            .try_prepare(self.transactions.as_ref(), self.locations.as_ref())
        {
            Ok(Some(prepared)) => {
                self.control_panel.update_months(prepared.available_months());
                self.prepared = Some(prepared);
                self.rerun_report();
            }
            Ok(None) => {
                self.reset_results();
                self.control_panel.set_status("Menunggu file CSV kedua");
            }
            Err(e) => {
                error!("pipeline failed: {e}");
                self.reset_results();
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    /// Filter and aggregate for the current month selection.
    fn rerun_report(&mut self) {
        let Some(prepared) = &self.prepared else {
            return;
        };

        let selection = MonthSelection::Only(self.control_panel.get_selected_months());
        let report = self.pipeline.report(prepared, &selection);
        let status = format!(
            "{} order, {} bulan dipilih, {} cocok lokasi",
            report.summary.order_count,
            report.selected_months.len(),
            report.join.matched
        );

        self.chart_viewer.set_report(report);
        self.control_panel.export_enabled = true;
        self.control_panel.set_status(&status);
    }

    fn handle_export_json(&mut self) {
        let Some(report) = &self.chart_viewer.report else {
            self.control_panel.set_status("Tidak ada laporan untuk diekspor");
            return;
        };

        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("laporan_truk_air.json")
            .save_file()
        else {
            return;
        };

        match ReportExporter::export_json(report, &output_path) {
            Ok(()) => {
                info!(path = %output_path.display(), "report exported");
                self.control_panel
                    .set_status(&format!("JSON tersimpan: {}", output_path.display()));
            }
            Err(e) => self.control_panel.set_error(&e.to_string()),
        }
    }

    fn handle_export_charts(&mut self) {
        let Some(report) = &self.chart_viewer.report else {
            self.control_panel.set_status("Tidak ada grafik untuk diekspor");
            return;
        };

        let Some(output_dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match ReportExporter::export_charts(report, &output_dir) {
            Ok(files) => self.control_panel.set_status(&format!(
                "{} grafik tersimpan di {}",
                files.len(),
                output_dir.display()
            )),
            Err(e) => self.control_panel.set_error(&e.to_string()),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::Browse(kind) => self.handle_browse_csv(kind),
                        ControlPanelAction::SelectionChanged => self.rerun_report(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
