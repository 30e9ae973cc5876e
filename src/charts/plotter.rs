//! Chart Plotter Module
//! Creates interactive dashboard charts using egui_plot.

use crate::format;
use crate::stats::{
    DriverSummary, FinancialSummary, GeoView, MapPoint, MonthlyRollup, MonthlyVolume,
    VehicleSummary,
};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

/// Series colors
pub const INCOME_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const EXPENSE_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const VOLUME_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const COUNT_COLOR: Color32 = Color32::from_rgb(135, 206, 235); // Sky blue
pub const MEAN_COLOR: Color32 = Color32::from_rgb(39, 174, 96); // Dark green

const CHART_HEIGHT: f32 = 260.0;

/// Popup lookup radius in degrees.
const POPUP_RADIUS_DEG: f64 = 0.01;

/// Creates dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Axis formatter that shows category names at integer positions.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        }
    }

    fn rupiah_formatter(
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        |mark, _range| format::rupiah(mark.value)
    }

    /// Income vs expense bars.
    pub fn draw_finance_chart(ui: &mut egui::Ui, summary: &FinancialSummary) {
        let bars = vec![
            Bar::new(0.0, summary.total_income)
                .width(0.6)
                .name("Pemasukan")
                .fill(INCOME_COLOR),
            Bar::new(1.0, summary.total_expense)
                .width(0.6)
                .name("Pengeluaran")
                .fill(EXPENSE_COLOR),
        ];

        Plot::new("finance_summary")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Total dalam Rupiah")
            .x_axis_formatter(Self::category_formatter(vec![
                "Pemasukan".to_string(),
                "Pengeluaran".to_string(),
            ]))
            .y_axis_formatter(Self::rupiah_formatter())
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Ringkasan Keuangan"));
            });
    }

    /// Income and expense per month as two lines.
    pub fn draw_monthly_chart(ui: &mut egui::Ui, monthly: &[MonthlyRollup]) {
        let labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
        let income: PlotPoints = monthly
            .iter()
            .enumerate()
            .map(|(i, m)| [i as f64, m.income])
            .collect();
        let expense: PlotPoints = monthly
            .iter()
            .enumerate()
            .map(|(i, m)| [i as f64, m.expense])
            .collect();

        Plot::new("monthly_rollup")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .legend(Legend::default())
            .x_axis_label("Bulan")
            .x_axis_formatter(Self::category_formatter(labels))
            .y_axis_formatter(Self::rupiah_formatter())
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(income)
                        .color(INCOME_COLOR)
                        .width(2.0)
                        .name("Pemasukan"),
                );
                plot_ui.line(
                    Line::new(expense)
                        .color(EXPENSE_COLOR)
                        .width(2.0)
                        .name("Pengeluaran"),
                );
            });
    }

    /// Delivered volume per month.
    pub fn draw_volume_chart(ui: &mut egui::Ui, volume: &[MonthlyVolume]) {
        let labels: Vec<String> = volume.iter().map(|m| m.month.to_string()).collect();
        let bars: Vec<Bar> = volume
            .iter()
            .enumerate()
            .map(|(i, m)| {
                Bar::new(i as f64, m.volume_liters)
                    .width(0.6)
                    .name(m.month.to_string())
            })
            .collect();

        Plot::new("monthly_volume")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Bulan")
            .y_axis_label("Volume (L)")
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(VOLUME_COLOR).name("Volume"));
            });
    }

    /// Driver table: orders and volume per driver.
    pub fn draw_driver_table(ui: &mut egui::Ui, drivers: &[DriverSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("driver_table")
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Sopir").strong());
                        ui.label(RichText::new("Total Order").strong());
                        ui.label(RichText::new("Total Volume").strong());
                        ui.end_row();

                        for d in drivers {
                            ui.label(&d.driver);
                            ui.label(d.order_count.to_string());
                            ui.label(format::liters(d.total_volume));
                            ui.end_row();
                        }
                    });
            });
    }

    /// Order count bars with the volume line below, one x slot per driver.
    pub fn draw_driver_chart(ui: &mut egui::Ui, drivers: &[DriverSummary]) {
        let labels: Vec<String> = drivers.iter().map(|d| d.driver.clone()).collect();
        let bars: Vec<Bar> = drivers
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Bar::new(i as f64, d.order_count as f64)
                    .width(0.6)
                    .name(&d.driver)
            })
            .collect();
        let volume: PlotPoints = drivers
            .iter()
            .enumerate()
            .map(|(i, d)| [i as f64, d.total_volume])
            .collect();

        Plot::new("driver_orders")
            .height(CHART_HEIGHT * 0.6)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Total Order")
            .x_axis_formatter(Self::category_formatter(labels.clone()))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(COUNT_COLOR).name("Total Order"));
            });

        Plot::new("driver_volume")
            .height(CHART_HEIGHT * 0.6)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Total Volume (L)")
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(volume).color(MEAN_COLOR).width(2.0).name("Total Volume"));
            });
    }

    /// Fleet usage: trip bars, expense and mean volume lines.
    pub fn draw_fleet_chart(ui: &mut egui::Ui, vehicles: &[VehicleSummary]) {
        let labels: Vec<String> = vehicles.iter().map(|v| v.vehicle_plate.clone()).collect();
        let bars: Vec<Bar> = vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Bar::new(i as f64, v.trip_count as f64)
                    .width(0.6)
                    .name(&v.vehicle_plate)
            })
            .collect();
        let expense: PlotPoints = vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| [i as f64, v.total_expense])
            .collect();
        let mean_volume: PlotPoints = vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| [i as f64, v.mean_volume])
            .collect();

        Plot::new("fleet_trips")
            .height(CHART_HEIGHT * 0.6)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Frekuensi Penggunaan")
            .x_axis_formatter(Self::category_formatter(labels.clone()))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(COUNT_COLOR).name("Frekuensi"));
            });

        Plot::new("fleet_costs")
            .height(CHART_HEIGHT * 0.6)
            .allow_scroll(false)
            .include_y(0.0)
            .legend(Legend::default())
            .y_axis_label("Pengeluaran & Rata-rata Volume")
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(expense)
                        .color(EXPENSE_COLOR)
                        .width(2.0)
                        .name("Pengeluaran"),
                );
                plot_ui.points(
                    Points::new(mean_volume)
                        .shape(MarkerShape::Square)
                        .radius(4.0)
                        .color(MEAN_COLOR)
                        .name("Rata-rata Volume"),
                );
            });
    }

    /// Heat color from cool blue (light load) to red (heavy load).
    pub fn heat_color(weight: f64, max_weight: f64) -> Color32 {
        let t = if max_weight > 0.0 {
            (weight / max_weight).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color32::from_rgb(lerp(52, 231), lerp(152, 76), lerp(219, 60))
    }

    fn nearest_point<'p>(points: &'p [MapPoint], at: &PlotPoint) -> Option<&'p MapPoint> {
        points
            .iter()
            .map(|p| {
                let dx = p.point.longitude - at.x;
                let dy = p.point.latitude - at.y;
                (p, dx * dx + dy * dy)
            })
            .filter(|(_, d2)| *d2 <= POPUP_RADIUS_DEG * POPUP_RADIUS_DEG)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(p, _)| p)
    }

    fn popup_text(point: &MapPoint) -> String {
        let date = point
            .popup
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{}\nVolume: {}\nPemasukan: {}\nTanggal: {}",
            point.popup.name,
            format::liters(point.popup.volume_liters),
            format::rupiah(point.popup.income),
            date
        )
    }

    /// Delivery map: longitude on x, latitude on y, markers sized and
    /// colored by delivered volume. Hovering a marker shows its popup.
    pub fn draw_map(ui: &mut egui::Ui, view: &GeoView) {
        let max_weight = view
            .points
            .iter()
            .map(|p| p.weight)
            .fold(0.0_f64, f64::max);
        // degrees visible around the center at the configured zoom
        let span = 360.0 / 2f64.powi(view.zoom as i32);
        let popup_points = view.points.clone();

        Plot::new("delivery_map")
            .height(420.0)
            .data_aspect(1.0)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .include_x(view.center.longitude - span / 2.0)
            .include_x(view.center.longitude + span / 2.0)
            .include_y(view.center.latitude - span / 2.0)
            .include_y(view.center.latitude + span / 2.0)
            .label_formatter(move |_name, value| {
                match Self::nearest_point(&popup_points, value) {
                    Some(point) => Self::popup_text(point),
                    None => format!("{:.4}, {:.4}", value.y, value.x),
                }
            })
            .show(ui, |plot_ui| {
                for point in &view.points {
                    let t = if max_weight > 0.0 {
                        point.weight / max_weight
                    } else {
                        0.0
                    };
                    plot_ui.points(
                        Points::new(vec![[point.point.longitude, point.point.latitude]])
                            .radius(4.0 + 10.0 * t as f32)
                            .color(Self::heat_color(point.weight, max_weight).gamma_multiply(0.8))
                            .filled(true),
                    );
                }

                plot_ui.points(
                    Points::new(vec![[view.center.longitude, view.center.latitude]])
                        .shape(MarkerShape::Cross)
                        .radius(6.0)
                        .color(Color32::GRAY)
                        .name("Pusat"),
                );
            });
    }
}
