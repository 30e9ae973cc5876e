//! CSV Data Loader Module
//! Reads the uploaded CSV files into text-typed Polars tables.

use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn { table: TableKind, column: String },
}

/// Which upload a table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableKind {
    Transactions,
    Locations,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Transactions => f.write_str("transaction"),
            TableKind::Locations => f.write_str("location"),
        }
    }
}

/// A freshly loaded table: every column is text, names are trimmed.
#[derive(Debug, Clone)]
pub struct RawTable {
    kind: TableKind,
    df: DataFrame,
}

impl RawTable {
    /// Wrap a DataFrame, trimming whitespace around its column names.
    pub fn new(kind: TableKind, df: DataFrame) -> Result<Self, LoaderError> {
        let columns: Vec<Column> = df
            .get_columns()
            .iter()
            .map(|col| col.clone().with_name(col.name().trim().into()))
            .collect();
        let df = DataFrame::new(columns)?;

        Ok(Self { kind, df })
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Get the number of data rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Get list of column names.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df
            .get_column_names()
            .iter()
            .any(|col| col.as_str() == name)
    }

    /// Fail on the first column of `names` the table does not carry.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), LoaderError> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(LoaderError::MissingColumn {
                table: self.kind,
                column: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Cell values of a column as text; null cells stay `None`.
    pub fn text_column(&self, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
        if !self.has_column(name) {
            return Err(LoaderError::MissingColumn {
                table: self.kind,
                column: name.to_string(),
            });
        }

        let series = self
            .df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();

        Ok(values)
    }

    /// Like [`RawTable::text_column`] for columns that may be absent.
    pub fn optional_text_column(
        &self,
        name: &str,
    ) -> Result<Option<Vec<Option<String>>>, LoaderError> {
        if self.has_column(name) {
            self.text_column(name).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file from disk. Schema inference is off so every column
    /// arrives as text and the cleaning rules decide all coercion.
    pub fn load_csv(path: &Path, kind: TableKind) -> Result<RawTable, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        info!(path = %path.display(), table = %kind, rows = df.height(), "loaded CSV");
        RawTable::new(kind, df)
    }

    /// Load CSV content that is already in memory, e.g. an upload.
    pub fn load_csv_bytes(bytes: Vec<u8>, kind: TableKind) -> Result<RawTable, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        info!(table = %kind, rows = df.height(), "loaded CSV from memory");
        RawTable::new(kind, df)
    }
}
