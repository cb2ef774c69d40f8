//! Output formatting and persistence for the ratings report.
//!
//! Supports pretty-printing, JSON logging, and CSV files.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::stats::ReportRow;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::Path;

/// CSV header, in column order.
pub const HEADER: [&str; 8] = [
    "id",
    "name",
    "numberOfRatings",
    "mean",
    "median",
    "mode",
    "variance",
    "stDev",
];

/// Logs report rows using Rust's debug pretty-print format.
pub fn print_pretty(rows: &[ReportRow]) {
    debug!("{:#?}", rows);
}

/// Logs report rows as pretty-printed JSON.
pub fn print_json(rows: &[ReportRow]) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

/// Writes the report to `path`, replacing any existing file.
///
/// Missing parent directories are created. The header row is written even
/// when there are no rows.
pub fn write_report(path: impl AsRef<Path>, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV report");

    let mut writer = WriterBuilder::new()
        .has_headers(false) // header is written by hand so empty reports keep it
        .from_writer(file);

    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join("guild_rater_tests").join(name)
    }

    fn row(id: u64, name: &str, mean: f64) -> ReportRow {
        ReportRow {
            id,
            name: name.to_string(),
            number_of_ratings: 1,
            mean,
            median: mean,
            mode: mean,
            variance: 0.0,
            st_dev: 0.0,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&[row(1, "Catan", 7.0)]);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&[row(1, "Catan", 7.0)]).unwrap();
    }

    #[test]
    fn test_write_report_creates_dirs_and_header() {
        let path = temp_path("nested/dir/report.csv");
        let _ = fs::remove_file(&path);

        write_report(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim_end(),
            "id,name,numberOfRatings,mean,median,mode,variance,stDev"
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_report_rows_in_order() {
        let path = temp_path("rows.csv");
        let _ = fs::remove_file(&path);

        write_report(&path, &[row(13, "Catan, Deluxe", 9.0), row(822, "Carcassonne", 6.5)])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "13,\"Catan, Deluxe\",1,9.0,9.0,9.0,0.0,0.0");
        assert!(lines[2].starts_with("822,Carcassonne,1,6.5"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_report_overwrites() {
        let path = temp_path("overwrite.csv");
        let _ = fs::remove_file(&path);

        write_report(&path, &[row(1, "A", 1.0), row(2, "B", 2.0)]).unwrap();
        write_report(&path, &[row(3, "C", 3.0)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
