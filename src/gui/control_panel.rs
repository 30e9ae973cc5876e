//! Control Panel Widget
//! Left side panel with the two uploads, the month filter and exports.

use crate::data::{MonthBucket, TableKind};
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Files chosen by the user.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub transactions_path: Option<PathBuf>,
    pub locations_path: Option<PathBuf>,
}

impl UserSettings {
    pub fn path_mut(&mut self, kind: TableKind) -> &mut Option<PathBuf> {
        match kind {
            TableKind::Transactions => &mut self.transactions_path,
            TableKind::Locations => &mut self.locations_path,
        }
    }
}

/// Left side control panel with file selection and the month filter.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub months: Vec<MonthBucket>,
    pub selected_months: Vec<bool>,
    pub status: String,
    pub is_error: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            months: Vec::new(),
            selected_months: Vec::new(),
            status: "Menunggu file CSV".to_string(),
            is_error: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the month options after a new upload. Every month starts
    /// selected.
    pub fn update_months(&mut self, months: BTreeSet<MonthBucket>) {
        self.months = months.into_iter().collect();
        self.selected_months = vec![true; self.months.len()];
    }

    pub fn clear_months(&mut self) {
        self.months.clear();
        self.selected_months.clear();
    }

    /// Months currently ticked.
    pub fn get_selected_months(&self) -> BTreeSet<MonthBucket> {
        self.months
            .iter()
            .zip(self.selected_months.iter())
            .filter(|(_, &selected)| selected)
            .map(|(month, _)| *month)
            .collect()
    }

    fn file_row(
        ui: &mut egui::Ui,
        label: &str,
        path: Option<&PathBuf>,
        action: ControlPanelAction,
    ) -> Option<ControlPanelAction> {
        let mut clicked = None;
        ui.label(RichText::new(label).size(12.0));
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = path
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "Belum ada file".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(if path.is_some() {
                        Color32::WHITE
                    } else {
                        Color32::GRAY
                    }));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Pilih").clicked() {
                            clicked = Some(action);
                        }
                    });
                });
            });
        clicked
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚚 Dashboard Truk Air")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Keuangan & Operasional")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("🗂️ Upload Dataset").size(14.0).strong());
        ui.add_space(5.0);

        if let Some(a) = Self::file_row(
            ui,
            "CSV Keuangan",
            self.settings.transactions_path.as_ref(),
            ControlPanelAction::Browse(TableKind::Transactions),
        ) {
            action = a;
        }
        ui.add_space(5.0);
        if let Some(a) = Self::file_row(
            ui,
            "CSV Lokasi",
            self.settings.locations_path.as_ref(),
            ControlPanelAction::Browse(TableKind::Locations),
        ) {
            action = a;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Month Filter Section =====
        ui.label(RichText::new("📅 Filter Bulan").size(14.0).strong());
        ui.add_space(5.0);

        if self.months.is_empty() {
            ui.label(RichText::new("Belum ada data").size(11.0).color(Color32::GRAY));
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(180.0).show(ui, |ui| {
                        for (i, month) in self.months.iter().enumerate() {
                            if i < self.selected_months.len()
                                && ui
                                    .checkbox(&mut self.selected_months[i], month.to_string())
                                    .changed()
                            {
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Pilih Semua").clicked() {
                    self.selected_months.iter_mut().for_each(|v| *v = true);
                    action = ControlPanelAction::SelectionChanged;
                }
                if ui.small_button("Kosongkan").clicked() {
                    self.selected_months.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::SelectionChanged;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let json_button = egui::Button::new(RichText::new("💾 Ekspor JSON").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(json_button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }

                ui.add_space(8.0);

                let png_button = egui::Button::new(RichText::new("🖼 Ekspor Grafik PNG").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("ℹ Status").size(14.0).strong());
        ui.add_space(5.0);

        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Error: {}", error);
        self.is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    Browse(TableKind),
    SelectionChanged,
    ExportJson,
    ExportCharts,
}
