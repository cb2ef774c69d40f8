use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::types::AggregateEntry;
use crate::analyzers::utility::{mean, median, mode, stddev, variance};

/// One line of the final report. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub id: u64,
    pub name: String,
    pub number_of_ratings: usize,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub variance: f64,
    pub st_dev: f64,
}

impl ReportRow {
    pub fn from_entry(entry: &AggregateEntry) -> Self {
        let values = &entry.ratings;
        let avg = mean(values);

        ReportRow {
            id: entry.item_id,
            name: entry.item_name.clone(),
            number_of_ratings: values.len(),
            mean: avg,
            median: median(values),
            mode: mode(values),
            variance: variance(values, avg),
            st_dev: stddev(values, avg),
        }
    }
}

/// Builds one row per item, highest mean first.
///
/// The sort is stable, so items with equal means stay in ascending id order.
pub fn report(items: &BTreeMap<u64, AggregateEntry>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = items.values().map(ReportRow::from_entry).collect();
    rows.sort_by(|a, b| b.mean.total_cmp(&a.mean));
    rows
}
