use std::collections::BTreeSet;
use std::path::PathBuf;

use tanker_dashboard::data::{DataLoader, MonthBucket, RawTable, TableKind};
use tanker_dashboard::export::ReportExporter;
use tanker_dashboard::{DashboardConfig, MonthSelection, Pipeline, PipelineError};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn fixtures() -> (RawTable, RawTable) {
    let transactions = DataLoader::load_csv(&fixture_path("keuangan.csv"), TableKind::Transactions)
        .expect("failed to load transactions fixture");
    let locations = DataLoader::load_csv(&fixture_path("lokasi.csv"), TableKind::Locations)
        .expect("failed to load locations fixture");
    (transactions, locations)
}

fn table(text: &str, kind: TableKind) -> RawTable {
    DataLoader::load_csv_bytes(text.as_bytes().to_vec(), kind).expect("csv should load")
}

fn months(values: &[&str]) -> BTreeSet<MonthBucket> {
    values.iter().map(|m| m.parse::<MonthBucket>().unwrap()).collect()
}

#[test]
fn join_preserves_row_count_and_order() {
    let (transactions, locations) = fixtures();
    let prepared = Pipeline::default()
        .prepare(&transactions, &locations)
        .expect("prepare failed");

    assert_eq!(prepared.transactions.len(), transactions.height());
    let rows: Vec<usize> = prepared.transactions.iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![1, 2, 3, 4, 5]);

    assert_eq!(prepared.join_stats.matched, 4);
    assert_eq!(prepared.join_stats.unmatched, 1);
    assert!(prepared.transactions[3].location.is_none());
}

#[test]
fn duplicate_location_names_keep_first_row() {
    let (transactions, locations) = fixtures();
    let prepared = Pipeline::default()
        .prepare(&transactions, &locations)
        .unwrap();

    let a = prepared.transactions[2].location.expect("Lokasi A should match");
    assert_eq!(a.latitude, -7.80);
    assert_eq!(a.longitude, 110.40);
}

#[test]
fn month_bucket_null_iff_date_null() {
    let (transactions, locations) = fixtures();
    let prepared = Pipeline::default()
        .prepare(&transactions, &locations)
        .unwrap();

    for record in &prepared.transactions {
        assert_eq!(record.month_bucket().is_none(), record.date.is_none());
    }
    assert!(prepared.transactions[4].date.is_none());
}

#[test]
fn full_report_over_all_months() {
    let (transactions, locations) = fixtures();
    let report = Pipeline::default()
        .run(&transactions, &locations, &MonthSelection::All)
        .unwrap();

    assert_eq!(report.selected_months, vec![
        "2024-01".parse::<MonthBucket>().unwrap(),
        "2024-02".parse().unwrap(),
    ]);

    assert_eq!(report.summary.order_count, 4);
    assert_eq!(report.summary.total_income, 4_050_000.0);
    assert_eq!(report.summary.total_expense, 350_000.0);

    let incomes: Vec<f64> = report.monthly.iter().map(|m| m.income).collect();
    assert_eq!(incomes, vec![2_250_000.0, 1_800_000.0]);
    let volumes: Vec<f64> = report.monthly_volume.iter().map(|m| m.volume_liters).collect();
    assert_eq!(volumes, vec![7500.0, 6000.0]);

    let drivers = report.drivers.as_ref().expect("driver column present");
    assert_eq!(drivers[0].driver, "Budi");
    assert_eq!(drivers[0].order_count, 3);
    assert_eq!(drivers[0].total_volume, 11_000.0);
    assert_eq!(drivers[1].driver, "Agus");

    let vehicles = report.vehicles.as_ref().expect("plate column present");
    assert_eq!(vehicles[0].vehicle_plate, "AB 1234 CD");
    assert_eq!(vehicles[0].trip_count, 2);
    assert_eq!(vehicles[0].total_expense, 300_000.0);
    assert_eq!(vehicles[0].mean_volume, 3750.0);

    assert_eq!(report.map.points.len(), 3);
    assert!((report.map.center.latitude - (-7.80 - 7.76 - 7.80) / 3.0).abs() < 1e-9);
    assert_eq!(report.map.points[1].popup.name, "Lokasi B");
}

#[test]
fn single_month_selection() {
    let (transactions, locations) = fixtures();
    let pipeline = Pipeline::default();
    let prepared = pipeline.prepare(&transactions, &locations).unwrap();

    let report = pipeline.report(&prepared, &MonthSelection::Only(months(&["2024-02"])));

    assert_eq!(report.summary.order_count, 2);
    assert_eq!(report.summary.total_income, 1_800_000.0);
    assert_eq!(report.monthly.len(), 1);
    assert_eq!(report.map.points.len(), 1);
}

#[test]
fn empty_selection_gives_empty_summaries() {
    let (transactions, locations) = fixtures();
    let report = Pipeline::default()
        .run(
            &transactions,
            &locations,
            &MonthSelection::Only(BTreeSet::new()),
        )
        .unwrap();

    assert_eq!(report.summary.order_count, 0);
    assert_eq!(report.summary.total_income, 0.0);
    assert!(report.monthly.is_empty());
    assert!(report.monthly_volume.is_empty());
    assert_eq!(report.drivers, Some(Vec::new()));
    assert!(report.map.points.is_empty());
    assert_eq!(report.map.center.latitude, -7.8);
    assert_eq!(report.map.center.longitude, 110.4);
}

#[test]
fn rupiah_amount_and_case_insensitive_join() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L)\n\
         lokasi a,2024-01-05,Rp 1.500.000,,100\n",
        TableKind::Transactions,
    );
    let locations = table(
        "Nama Lokasi,Latitude,Longitude\nLokasi A,-7.80,110.40\n",
        TableKind::Locations,
    );

    let prepared = Pipeline::default().prepare(&transactions, &locations).unwrap();
    let record = &prepared.transactions[0];

    assert_eq!(record.amount_in, 1_500_000.0);
    let point = record.location.expect("should join");
    assert_eq!(point.latitude, -7.80);
    assert_eq!(point.longitude, 110.40);
}

#[test]
fn optional_columns_absent_hide_sections() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L)\nA,2024-01-05,100,0,10\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Latitude,Longitude\n", TableKind::Locations);

    let report = Pipeline::default()
        .run(&transactions, &locations, &MonthSelection::All)
        .unwrap();

    assert!(report.drivers.is_none());
    assert!(report.vehicles.is_none());
    assert_eq!(report.summary.total_income, 100.0);
}

#[test]
fn missing_required_column_fails_with_name() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Volume (L)\nA,2024-01-05,100,10\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Latitude,Longitude\n", TableKind::Locations);

    let err = Pipeline::default()
        .prepare(&transactions, &locations)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Normalize(_)));
    assert_eq!(
        err.to_string(),
        "Missing column 'Pengeluaran' in transaction table"
    );
}

#[test]
fn missing_location_column_fails() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L)\nA,2024-01-05,100,0,10\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Lat,Longitude\nA,1,1\n", TableKind::Locations);

    let err = Pipeline::default()
        .prepare(&transactions, &locations)
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing column 'Latitude' in location table");
}

#[test]
fn malformed_volume_is_reported_not_zeroed() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L)\n\
         A,2024-01-05,100,0,10\n\
         B,2024-01-06,100,0,sepuluh\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Latitude,Longitude\n", TableKind::Locations);

    let err = Pipeline::default()
        .prepare(&transactions, &locations)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Malformed number 'sepuluh' in transaction table, row 2, column 'Volume (L)'"
    );
}

#[test]
fn missing_upload_is_idle_not_error() {
    let (transactions, _) = fixtures();
    let pipeline = Pipeline::default();

    assert!(pipeline.try_prepare(None, None).unwrap().is_none());
    assert!(pipeline.try_prepare(Some(&transactions), None).unwrap().is_none());
}

#[test]
fn custom_column_names() {
    let mut config = DashboardConfig::default();
    config.columns.order = "Tujuan".to_string();
    config.columns.location_name = "Tempat".to_string();

    let transactions = table(
        "Tujuan,Tanggal,Pemasukan,Pengeluaran,Volume (L)\nPasar,2024-03-01,10,0,1\n",
        TableKind::Transactions,
    );
    let locations = table("Tempat,Latitude,Longitude\npasar,-7.9,110.3\n", TableKind::Locations);

    let prepared = Pipeline::new(config).prepare(&transactions, &locations).unwrap();
    assert!(prepared.transactions[0].is_geo_valid());
}

#[test]
fn export_json_writes_report() {
    let (transactions, locations) = fixtures();
    let report = Pipeline::default()
        .run(&transactions, &locations, &MonthSelection::All)
        .unwrap();

    let path = std::env::temp_dir().join(format!(
        "tanker_dashboard_report_{}.json",
        std::process::id()
    ));
    ReportExporter::export_json(&report, &path).expect("export failed");

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(value["selected_months"][0], "2024-01");
    assert_eq!(value["summary"]["total_income"], 4_050_000.0);
    assert_eq!(value["drivers"][0]["driver"], "Budi");
    assert_eq!(value["map"]["points"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["join"]["unmatched"], 1);
}

#[test]
fn export_charts_writes_three_pngs() {
    let (transactions, locations) = fixtures();
    let report = Pipeline::default()
        .run(&transactions, &locations, &MonthSelection::All)
        .unwrap();

    let dir = std::env::temp_dir().join(format!("tanker_dashboard_charts_{}", std::process::id()));
    let files = ReportExporter::export_charts(&report, &dir).expect("chart export failed");

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["ringkasan_keuangan.png", "kinerja_sopir.png", "penggunaan_armada.png"]
    );

    for file in &files {
        let bytes = std::fs::read(file).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "{} is not a PNG", file.display());
    }
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn export_charts_skips_missing_group_tables() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L)\nA,2024-01-05,100,50,10\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Latitude,Longitude\n", TableKind::Locations);
    let report = Pipeline::default()
        .run(&transactions, &locations, &MonthSelection::All)
        .unwrap();

    let dir = std::env::temp_dir().join(format!(
        "tanker_dashboard_finance_only_{}",
        std::process::id()
    ));
    let files = ReportExporter::export_charts(&report, &dir).expect("chart export failed");

    assert_eq!(files.len(), 1);
    assert!(std::fs::metadata(&files[0]).unwrap().len() > 0);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn extra_currency_column_is_totalled() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L),Jumlah\n\
         A,2024-01-05,100,0,10,Rp 1.000\n\
         B,2024-02-05,100,0,10,Rp 2.500\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Latitude,Longitude\n", TableKind::Locations);
    let pipeline = Pipeline::default();
    let prepared = pipeline.prepare(&transactions, &locations).unwrap();

    let report = pipeline.report(&prepared, &MonthSelection::Only(months(&["2024-02"])));
    assert_eq!(report.summary.other_totals.get("Jumlah"), Some(&2_500.0));
}

#[test]
fn month_first_slash_dates_bucket_by_month() {
    let transactions = table(
        "Order,Tanggal,Pemasukan,Pengeluaran,Volume (L)\nA,03/04/2024,100,0,10\n",
        TableKind::Transactions,
    );
    let locations = table("Nama Lokasi,Latitude,Longitude\n", TableKind::Locations);
    let prepared = Pipeline::default().prepare(&transactions, &locations).unwrap();

    let buckets: Vec<String> = prepared
        .available_months()
        .iter()
        .map(|m| m.to_string())
        .collect();
    assert_eq!(buckets, vec!["2024-03"]);
}
