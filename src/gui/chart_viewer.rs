//! Chart Viewer Widget
//! Central scrollable panel showing the six dashboard sections.

use crate::charts::ChartPlotter;
use crate::format;
use crate::pipeline::DashboardReport;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 18.0;

/// Scrollable dashboard for one report.
#[derive(Default)]
pub struct ChartViewer {
    pub report: Option<DashboardReport>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.report = None;
    }

    pub fn set_report(&mut self, report: DashboardReport) {
        self.report = Some(report);
    }

    /// Draw the dashboard, or the idle prompt when there is no report.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(report) = &self.report else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(
                        "⬆️ Silakan unggah file CSV keuangan dan lokasi di panel samping untuk memulai.",
                    )
                    .size(18.0),
                );
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("📊 Dashboard Keuangan Truk Air").size(24.0));
                ui.add_space(SECTION_SPACING);

                Self::section(ui, "1️⃣ Ringkasan Keuangan", |ui| {
                    Self::draw_metrics(ui, report);
                    ui.add_space(8.0);
                    ChartPlotter::draw_finance_chart(ui, &report.summary);
                });

                Self::section(ui, "2️⃣ Pemasukan & Pengeluaran per Bulan", |ui| {
                    ChartPlotter::draw_monthly_chart(ui, &report.monthly);
                });

                Self::section(ui, "3️⃣ Volume Air Dikirim per Bulan", |ui| {
                    ChartPlotter::draw_volume_chart(ui, &report.monthly_volume);
                });

                if let Some(drivers) = &report.drivers {
                    Self::section(ui, "4️⃣ Kinerja Sopir", |ui| {
                        ChartPlotter::draw_driver_table(ui, drivers);
                        ui.add_space(8.0);
                        ChartPlotter::draw_driver_chart(ui, drivers);
                    });
                }

                if let Some(vehicles) = &report.vehicles {
                    Self::section(ui, "5️⃣ Penggunaan Armada", |ui| {
                        ChartPlotter::draw_fleet_chart(ui, vehicles);
                    });
                }

                Self::section(ui, "6️⃣ Peta Lokasi Order", |ui| {
                    ui.label(
                        RichText::new(format!(
                            "{} titik pengiriman, {} order tanpa koordinat",
                            report.map.points.len(),
                            report.summary.order_count.saturating_sub(report.map.points.len())
                        ))
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                    ChartPlotter::draw_map(ui, &report.map);
                });

                ui.label(
                    RichText::new(
                        "Dashboard interaktif untuk eksplorasi data keuangan dan operasional truk air isi ulang.",
                    )
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            });
    }

    fn section(ui: &mut egui::Ui, title: &str, body: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                body(ui);
            });
        ui.add_space(SECTION_SPACING);
    }

    fn draw_metrics(ui: &mut egui::Ui, report: &DashboardReport) {
        let summary = &report.summary;
        ui.columns(3, |cols| {
            Self::metric(&mut cols[0], "Total Pemasukan", &format::rupiah(summary.total_income));
            Self::metric(
                &mut cols[1],
                "Total Pengeluaran",
                &format::rupiah(summary.total_expense),
            );
            Self::metric(
                &mut cols[2],
                "Total Order",
                &format!("{} transaksi", summary.order_count),
            );
        });

        for (column, total) in &summary.other_totals {
            ui.label(
                RichText::new(format!("Total {column}: {}", format::rupiah(*total)))
                    .size(12.0)
                    .color(Color32::GRAY),
            );
        }
    }

    fn metric(ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
        ui.label(RichText::new(value).size(22.0).strong());
    }
}
