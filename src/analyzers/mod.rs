//! Per-item aggregation of guild ratings.
//!
//! This module holds the pipeline's data types, folds per-member rating sets
//! into one rating sample per item, and provides the summary statistics used
//! by the report.

pub mod aggregate;
pub mod types;
pub mod utility;
