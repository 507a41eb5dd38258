//! CSV and JSON readers for run inputs, writers for run results.
//!
//! Inputs:
//!
//! | file | columns |
//! |------|---------|
//! | orders | `CustomerID,ItemID,Amount[,Date]` |
//! | item master | `ItemID,Size,Weight` |
//! | inventory | `ItemID,Amount` |
//! | layout | JSON `{ "nodes": [...], "edges": [...] }` |
//!
//! Outputs are `assignment.json` (block → item), `metrics.csv`
//! (`Metric,Value`), and `orders.json` (per-order diagnostics).

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::evaluation::EvaluationReport;
use crate::models::{Assignment, InventoryLine, ItemSpec, Layout, OrderLine};

/// File name of the block → item mapping.
pub const ASSIGNMENT_FILE: &str = "assignment.json";
/// File name of the aggregate metrics table.
pub const METRICS_FILE: &str = "metrics.csv";
/// File name of the per-order diagnostics.
pub const ORDERS_FILE: &str = "orders.json";

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "csv loaded");
    Ok(rows)
}

/// Reads raw order lines.
pub fn read_order_lines(path: impl AsRef<Path>) -> Result<Vec<OrderLine>> {
    read_csv(path.as_ref())
}

/// Reads item master rows.
pub fn read_item_master(path: impl AsRef<Path>) -> Result<Vec<ItemSpec>> {
    read_csv(path.as_ref())
}

/// Reads inventory override rows.
pub fn read_inventory(path: impl AsRef<Path>) -> Result<Vec<InventoryLine>> {
    read_csv(path.as_ref())
}

/// Reads a JSON layout.
pub fn read_layout(path: impl AsRef<Path>) -> Result<Layout> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// One row of `metrics.csv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    /// Metric name.
    #[serde(rename = "Metric")]
    pub metric: String,
    /// Metric value.
    #[serde(rename = "Value")]
    pub value: f64,
}

impl MetricRow {
    /// Creates a metric row.
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }
}

/// Standard metric rows for a report, with names prefixed by `label` when
/// one is given (e.g. `random_total_distance`).
pub fn report_metrics(report: &EvaluationReport, label: Option<&str>) -> Vec<MetricRow> {
    let name = |metric: &str| match label {
        Some(l) => format!("{l}_{metric}"),
        None => metric.to_string(),
    };
    vec![
        MetricRow::new(name("total_distance"), report.total_distance),
        MetricRow::new(name("total_handling_effort"), report.total_handling_effort),
        MetricRow::new(name("orders"), report.num_orders() as f64),
        MetricRow::new(name("unfilled_units"), report.total_unfilled() as f64),
    ]
}

/// Writes an assignment as a JSON object keyed by block id.
pub fn write_assignment(path: impl AsRef<Path>, assignment: &Assignment) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, assignment)?;
    Ok(())
}

/// Writes `Metric,Value` rows.
pub fn write_metrics(path: impl AsRef<Path>, rows: &[MetricRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes per-order diagnostics as a JSON array.
pub fn write_order_metrics(path: impl AsRef<Path>, report: &EvaluationReport) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &report.orders)?;
    Ok(())
}

/// Paths of the files written by [`write_results`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFiles {
    /// `assignment.json`
    pub assignment: PathBuf,
    /// `metrics.csv`
    pub metrics: PathBuf,
    /// `orders.json`
    pub orders: PathBuf,
}

/// Writes all result files into `dir`, creating it if needed.
pub fn write_results(
    dir: impl AsRef<Path>,
    assignment: &Assignment,
    report: &EvaluationReport,
    metrics: &[MetricRow],
) -> Result<ResultFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let files = ResultFiles {
        assignment: dir.join(ASSIGNMENT_FILE),
        metrics: dir.join(METRICS_FILE),
        orders: dir.join(ORDERS_FILE),
    };
    write_assignment(&files.assignment, assignment)?;
    write_metrics(&files.metrics, metrics)?;
    write_order_metrics(&files.orders, report)?;
    tracing::info!(dir = %dir.display(), "results written");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SlottingError;
    use crate::evaluation::OrderMetrics;
    use crate::models::{NodeRole, OrderKey};
    use std::collections::BTreeMap;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn temp_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{line}").expect("write");
        }
        file
    }

    #[test]
    fn test_read_order_lines_with_optional_date() {
        let undated = temp_csv(&["CustomerID,ItemID,Amount", "p1,A,10", " p2 , B , 3 "]);
        let lines = read_order_lines(undated.path()).expect("parses");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], OrderLine::new("p2", "B", 3));

        let dated = temp_csv(&["CustomerID,ItemID,Amount,Date", "p1,A,10,2024-01-02", "p1,B,1,"]);
        let lines = read_order_lines(dated.path()).expect("parses");
        assert_eq!(lines[0].date.as_deref(), Some("2024-01-02"));
        assert_eq!(lines[1].date, None);
    }

    #[test]
    fn test_read_item_master_and_inventory() {
        let items = temp_csv(&["ItemID,Size,Weight", "A,1,2.5", "B,0.5,8"]);
        let specs = read_item_master(items.path()).expect("parses");
        assert_eq!(specs[1], ItemSpec::new("B", 0.5, 8.0));

        let inv = temp_csv(&["ItemID,Amount", "A,120"]);
        let rows = read_inventory(inv.path()).expect("parses");
        assert_eq!(rows, vec![InventoryLine::new("A", 120)]);
    }

    #[test]
    fn test_bad_amount_is_csv_error() {
        let file = temp_csv(&["CustomerID,ItemID,Amount", "p1,A,ten"]);
        assert!(matches!(read_order_lines(file.path()), Err(SlottingError::Csv(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            read_item_master("does/not/exist.csv"),
            Err(SlottingError::Io(_))
        ));
    }

    #[test]
    fn test_read_layout() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"nodes":[{{"id":"depot","role":"depot"}},{{"id":"b1","role":"block"}}],
               "edges":[{{"source":"depot","target":"b1","weight":2.5}}]}}"#
        )
        .expect("write");
        let layout = read_layout(file.path()).expect("parses");
        assert_eq!(layout.nodes[1].role, NodeRole::Block);
        assert_eq!(layout.edges[0].weight, 2.5);
    }

    #[test]
    fn test_write_results() {
        let dir = tempdir().expect("temp dir");
        let mut assignment = Assignment::new();
        assignment.assign("b10", "A");
        assignment.assign("b2", "B");
        let report = EvaluationReport {
            total_distance: 8.0,
            total_handling_effort: 12.5,
            orders: vec![OrderMetrics {
                key: OrderKey::customer("p1"),
                distance: 8.0,
                handling_effort: 12.5,
                route: vec!["depot".into(), "b2".into(), "depot".into()],
                unfilled: BTreeMap::new(),
                skipped_items: vec![],
            }],
        };
        let mut metrics = report_metrics(&report, None);
        metrics.extend(report_metrics(&report, Some("random")));

        let files = write_results(dir.path().join("out"), &assignment, &report, &metrics)
            .expect("writes");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.assignment).expect("read"))
                .expect("json");
        assert_eq!(json["b2"], "B");
        assert_eq!(json["b10"], "A");

        let csv_text = fs::read_to_string(&files.metrics).expect("read");
        let mut rows = csv_text.lines();
        assert_eq!(rows.next(), Some("Metric,Value"));
        assert_eq!(rows.next(), Some("total_distance,8.0"));
        assert!(csv_text.contains("random_total_handling_effort,12.5"));

        let orders: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.orders).expect("read")).expect("json");
        assert_eq!(orders[0]["route"][1], "b2");
    }
}
