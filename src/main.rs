//! Tanker Dashboard - water tanker finance & delivery dashboard
//!
//! Loads the finance and location CSV files and shows summary charts and a
//! delivery map.

use eframe::egui;
use tanker_dashboard::gui::DashboardApp;
use tanker_dashboard::{DashboardConfig, Pipeline};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Dashboard Keuangan Truk Air"),
        ..Default::default()
    };

    let pipeline = Pipeline::new(DashboardConfig::default());

    // Run the application
    eframe::run_native(
        "Dashboard Keuangan Truk Air",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, pipeline)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start dashboard window: {e}"))
}
