use crate::error::{ReportError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

/// File formats a report table can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "md",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn write_markdown<T>(path: &Path, title: &str, rows: &[T]) -> Result<()>
where
    T: Tabled + Clone,
{
    let mut s = format!("# {}\n\n", title);
    s.push_str(&render_table(rows, rows.len()).unwrap_or_else(|| "(no rows)".to_string()));
    s.push('\n');
    std::fs::write(path, s)?;
    Ok(())
}

fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

/// Write one report table to `<dir>/<stem>.<ext>` and return the path.
pub fn export_report<T>(format: ExportFormat, title: &str, rows: &[T], dir: &Path, stem: &str) -> Result<PathBuf>
where
    T: Tabled + Serialize + Clone,
{
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    match format {
        ExportFormat::Csv => write_csv(&path, rows)?,
        ExportFormat::Json => write_json(&path, rows)?,
        ExportFormat::Markdown => write_markdown(&path, title, rows)?,
    }
    info!("exported {} rows to {}", rows.len(), path.display());
    Ok(path)
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    print!("{}", render_preview(title, note, rows, max_rows));
}

/// Console text for a table, capped at `max_rows` rows.
fn render_preview<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let mut s = format!("\n{}\n", title);
    if let Some(n) = note {
        s.push_str(&format!("({})\n", n));
    }
    s.push('\n');
    if rows.is_empty() {
        s.push_str("(no rows)\n\n");
        return s;
    }
    if let Some(table) = render_table(rows, max_rows) {
        s.push_str(&table);
        s.push('\n');
    }
    if rows.len() > max_rows {
        s.push_str(&format!("... {} more rows\n", rows.len() - max_rows));
    }
    s.push('\n');
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricRow;

    fn rows() -> Vec<MetricRow> {
        vec![
            MetricRow {
                metric: "SAIDI".to_string(),
                value: "45.20".to_string(),
                unit: "min/cons".to_string(),
            },
            MetricRow {
                metric: "SAIFI".to_string(),
                value: "3.80".to_string(),
                unit: "int/cons".to_string(),
            },
        ]
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ReportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_report(ExportFormat::Csv, "Indices", &rows(), dir.path(), "indices").unwrap();
        assert_eq!(path, dir.path().join("indices.csv"));
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Metric,Value,Unit"));
        assert_eq!(lines.next(), Some("SAIDI,45.20,min/cons"));
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_report(ExportFormat::Json, "Indices", &rows(), dir.path(), "indices").unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value[1]["Metric"], "SAIFI");
    }

    #[test]
    fn test_export_markdown_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out");
        let path = export_report(ExportFormat::Markdown, "Indices", &rows(), &nested, "indices").unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("# Indices"));
        assert!(text.contains("| SAIDI"));
    }

    #[test]
    fn test_preview_caps_rows() {
        let text = render_preview("Indices", Some("weighted"), &rows(), 1);
        assert!(text.contains("(weighted)"));
        assert!(text.contains("| SAIDI"));
        assert!(!text.contains("| SAIFI"));
        assert!(text.contains("... 1 more rows"));
    }

    #[test]
    fn test_preview_with_zero_rows_allowed() {
        let text = render_preview("Indices", None, &rows(), 0);
        assert!(!text.contains("(no rows)"));
        assert!(!text.contains('|'));
        assert!(text.contains("... 2 more rows"));

        let empty: Vec<MetricRow> = Vec::new();
        assert!(render_preview("Indices", None, &empty, 5).contains("(no rows)"));
    }
}
