//! Data module - CSV loading, cleaning, joining and filtering

mod filter;
mod joiner;
mod loader;
mod model;
mod normalizer;

pub use filter::{available_months, filter_by_months};
pub use joiner::{join_locations, JoinStats, LocationIndex};
pub use loader::{DataLoader, LoaderError, RawTable, TableKind};
pub use model::{GeoPoint, LocationRecord, MonthBucket, ParseMonthError, TransactionRecord};
pub use normalizer::{
    clean_currency, normalize_key, parse_date, parse_volume, strip_currency, MalformedValue,
    NormalizeError, Normalizer,
};
