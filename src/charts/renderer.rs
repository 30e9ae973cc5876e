//! Static Chart Renderer
//! Renders the summary, driver and fleet charts to PNG files with plotters.
//!
//! Layout follows the on-screen dashboard:
//! 1. Finance: income vs expense bars
//! 2. Drivers: order-count bars, total volume line on a secondary axis
//! 3. Fleet: trip bars, expense and mean-volume lines on a secondary axis

use crate::format;
use crate::stats::{DriverSummary, FinancialSummary, VehicleSummary};
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const INCOME: RGBColor = RGBColor(102, 194, 165);
const EXPENSE: RGBColor = RGBColor(252, 141, 98);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const LINE_GREEN: RGBColor = RGBColor(0, 128, 0);
const LINE_RED: RGBColor = RGBColor(220, 20, 60);

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render for {0}")]
    Empty(&'static str),
    #[error("Chart rendering failed: {0}")]
    Draw(String),
}

type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Headroom above the tallest value so bars never touch the frame.
fn upper_bound(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}

fn label_for(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Income vs expense bar chart.
    pub fn render_finance_png(
        summary: &FinancialSummary,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        Self::draw_finance(summary, path, size).map_err(|e| RenderError::Draw(e.to_string()))
    }

    fn draw_finance(summary: &FinancialSummary, path: &Path, size: (u32, u32)) -> DrawResult {
        let labels = vec!["Pemasukan".to_string(), "Pengeluaran".to_string()];
        let values = [
            (summary.total_income, INCOME),
            (summary.total_expense, EXPENSE),
        ];
        let y_max = upper_bound(values.iter().map(|(v, _)| *v));

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Ringkasan Keuangan", (FONT, 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(120)
            .build_cartesian_2d((0usize..2usize).into_segmented(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Total dalam Rupiah")
            .x_label_formatter(&|v| label_for(&labels, v))
            .y_label_formatter(&|v| format::rupiah(*v))
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, (value, color))| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                color.filled(),
            );
            bar.set_margin(0, 0, 30, 30);
            bar
        }))?;

        root.present()?;
        Ok(())
    }

    /// Orders per driver as bars with total volume on the secondary axis.
    pub fn render_driver_png(
        drivers: &[DriverSummary],
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if drivers.is_empty() {
            return Err(RenderError::Empty("driver chart"));
        }
        Self::draw_driver(drivers, path, size).map_err(|e| RenderError::Draw(e.to_string()))
    }

    fn draw_driver(drivers: &[DriverSummary], path: &Path, size: (u32, u32)) -> DrawResult {
        let n = drivers.len();
        let labels: Vec<String> = drivers.iter().map(|d| d.driver.clone()).collect();
        let count_max = upper_bound(drivers.iter().map(|d| d.order_count as f64));
        let volume_max = upper_bound(drivers.iter().map(|d| d.total_volume));

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Kinerja Sopir", (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .right_y_label_area_size(90)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..count_max)?
            .set_secondary_coord((0..n).into_segmented(), 0f64..volume_max);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Sopir")
            .y_desc("Total Order")
            .x_label_formatter(&|v| label_for(&labels, v))
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc("Total Volume (L)")
            .y_label_formatter(&|v| format::thousands(*v))
            .draw()?;

        chart.draw_series(drivers.iter().enumerate().map(|(i, d)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), d.order_count as f64),
                ],
                SKY_BLUE.filled(),
            );
            bar.set_margin(0, 0, 10, 10);
            bar
        }))?;

        let volume: Vec<(SegmentValue<usize>, f64)> = drivers
            .iter()
            .enumerate()
            .map(|(i, d)| (SegmentValue::CenterOf(i), d.total_volume))
            .collect();
        chart.draw_secondary_series(LineSeries::new(volume.clone(), LINE_GREEN.stroke_width(2)))?;
        chart.draw_secondary_series(
            volume
                .into_iter()
                .map(|point| Circle::new(point, 4, LINE_GREEN.filled())),
        )?;

        root.present()?;
        Ok(())
    }

    /// Trips per vehicle as bars; expense and mean volume on the secondary axis.
    pub fn render_fleet_png(
        vehicles: &[VehicleSummary],
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        if vehicles.is_empty() {
            return Err(RenderError::Empty("fleet chart"));
        }
        Self::draw_fleet(vehicles, path, size).map_err(|e| RenderError::Draw(e.to_string()))
    }

    fn draw_fleet(vehicles: &[VehicleSummary], path: &Path, size: (u32, u32)) -> DrawResult {
        let n = vehicles.len();
        let labels: Vec<String> = vehicles.iter().map(|v| v.vehicle_plate.clone()).collect();
        let trips_max = upper_bound(vehicles.iter().map(|v| v.trip_count as f64));
        let secondary_max = upper_bound(
            vehicles
                .iter()
                .flat_map(|v| [v.total_expense, v.mean_volume]),
        );

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Penggunaan Armada", (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .right_y_label_area_size(120)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..trips_max)?
            .set_secondary_coord((0..n).into_segmented(), 0f64..secondary_max);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .y_desc("Frekuensi Penggunaan")
            .x_label_formatter(&|v| label_for(&labels, v))
            .draw()?;
        chart
            .configure_secondary_axes()
            .y_desc("Pengeluaran & Rata-rata Volume")
            .y_label_formatter(&|v| format::thousands(*v))
            .draw()?;

        chart.draw_series(vehicles.iter().enumerate().map(|(i, v)| {
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), v.trip_count as f64),
                ],
                SKY_BLUE.filled(),
            );
            bar.set_margin(0, 0, 10, 10);
            bar
        }))?;

        let expense: Vec<(SegmentValue<usize>, f64)> = vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| (SegmentValue::CenterOf(i), v.total_expense))
            .collect();
        let mean_volume: Vec<(SegmentValue<usize>, f64)> = vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| (SegmentValue::CenterOf(i), v.mean_volume))
            .collect();

        chart
            .draw_secondary_series(LineSeries::new(expense.clone(), LINE_RED.stroke_width(2)))?
            .label("Pengeluaran")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_RED));
        chart.draw_secondary_series(
            expense
                .into_iter()
                .map(|point| Circle::new(point, 4, LINE_RED.filled())),
        )?;
        chart
            .draw_secondary_series(LineSeries::new(
                mean_volume.clone(),
                LINE_GREEN.stroke_width(2),
            ))?
            .label("Rata-rata Volume")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], LINE_GREEN));
        chart.draw_secondary_series(
            mean_volume
                .into_iter()
                .map(|point| TriangleMarker::new(point, 5, LINE_GREEN.filled())),
        )?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}
