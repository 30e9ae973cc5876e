//! Location Joiner Module
//! Left-joins coordinates onto transactions by normalized location name.

use super::model::{GeoPoint, LocationRecord, TransactionRecord};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Match counts from one join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub matched: usize,
    pub unmatched: usize,
}

/// Lookup from normalized location name to coordinates.
#[derive(Debug, Default)]
pub struct LocationIndex {
    points: HashMap<String, Option<GeoPoint>>,
}

impl LocationIndex {
    /// Build the index. When several rows normalize to the same name the
    /// first one wins.
    pub fn build(locations: &[LocationRecord]) -> Self {
        let mut points = HashMap::with_capacity(locations.len());
        let mut duplicates = 0usize;

        for location in locations {
            if points.contains_key(&location.location_key) {
                duplicates += 1;
                debug!(
                    name = %location.location_name,
                    row = location.row,
                    "duplicate location name ignored"
                );
                continue;
            }
            points.insert(location.location_key.clone(), location.point);
        }

        if duplicates > 0 {
            warn!(duplicates, "location table has duplicate names, first occurrence kept");
        }

        Self { points }
    }

    pub fn lookup(&self, key: &str) -> Option<GeoPoint> {
        self.points.get(key).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Attach coordinates to every transaction. Row count and order are
/// unchanged; rows without a match keep `location = None`.
pub fn join_locations(
    mut transactions: Vec<TransactionRecord>,
    locations: &[LocationRecord],
) -> (Vec<TransactionRecord>, JoinStats) {
    let index = LocationIndex::build(locations);
    if index.is_empty() {
        warn!("location table is empty, no transaction gets coordinates");
    }
    let mut stats = JoinStats::default();

    for record in &mut transactions {
        record.location = index.lookup(&record.order_key);
        if record.location.is_some() {
            stats.matched += 1;
        } else {
            stats.unmatched += 1;
        }
    }

    debug!(
        locations = index.len(),
        matched = stats.matched,
        unmatched = stats.unmatched,
        "joined locations"
    );
    (transactions, stats)
}
