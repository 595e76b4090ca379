//! Configuration file handling.
//!
//! Settings come from `.reliability.toml` (or `--config`); command-line
//! flags override whatever the file says.

use crate::cli::Args;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = ".reliability.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Rows shown per table in console previews.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Where exported reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            preview_rows: default_preview_rows(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_preview_rows() -> usize {
    10
}

fn default_output_dir() -> String {
    "reports".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Directory of CSV files; the built-in sample is used when unset.
    #[serde(default)]
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// How many feeders the dashboard lists as critical.
    #[serde(default = "default_critical_top_n")]
    pub critical_top_n: usize,

    /// csv, json or markdown.
    #[serde(default = "default_export_format")]
    pub export_format: String,

    /// Interruption log window, `YYYY-MM-DD`, inclusive.
    #[serde(default)]
    pub period_start: Option<String>,

    #[serde(default)]
    pub period_end: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            critical_top_n: default_critical_top_n(),
            export_format: default_export_format(),
            period_start: None,
            period_end: None,
        }
    }
}

fn default_critical_top_n() -> usize {
    crate::engine::CRITICAL_FEEDER_COUNT
}

fn default_export_format() -> String {
    "csv".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `.reliability.toml` from the working directory if present.
    pub fn load_default() -> Result<Option<Self>> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Commented TOML with every default filled in, for `--init-config`.
    pub fn default_toml() -> String {
        let body = toml::to_string_pretty(&Config::default()).unwrap_or_default();
        format!(
            "# Reliability report configuration\n\
             # data_dir: directory of CSV files (regions.csv, feeders.csv, ...)\n\
             # period_start / period_end: interruption log window, YYYY-MM-DD\n\n{}",
            body
        )
    }

    /// Apply command-line overrides.
    pub fn merge_with_args(&mut self, args: &Args) {
        if args.verbose {
            self.general.verbose = true;
        }
        if let Some(rows) = args.preview_rows {
            self.general.preview_rows = rows;
        }
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = dir.display().to_string();
        }
        if let Some(ref dir) = args.data_dir {
            self.data.data_dir = Some(dir.display().to_string());
        }
        if let Some(n) = args.top {
            self.report.critical_top_n = n;
        }
        if let Some(format) = args.export {
            self.report.export_format = format.name().to_string();
        }
        if let Some(from) = args.from {
            self.report.period_start = Some(from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = args.to {
            self.report.period_end = Some(to.format("%Y-%m-%d").to_string());
        }
    }

    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data.data_dir.as_ref().map(PathBuf::from)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.general.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.preview_rows, 10);
        assert_eq!(config.report.critical_top_n, 6);
        assert_eq!(config.report.export_format, "csv");
        assert!(config.data.data_dir.is_none());
    }

    #[test]
    fn test_default_toml_round_trips() {
        let text = Config::default_toml();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed = Config::parse("[report]\nperiod_start = \"2024-03-01\"\n").unwrap();
        assert_eq!(parsed.report.period_start.as_deref(), Some("2024-03-01"));
        assert_eq!(parsed.report.critical_top_n, 6);
        assert_eq!(parsed.general.output_dir, "reports");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            Config::parse("[report\n"),
            Err(crate::error::ReportError::Config(_))
        ));
    }

    #[test]
    fn test_args_override_file() {
        let mut config = Config::parse("[general]\npreview_rows = 3\n").unwrap();
        let args = Args::parse_from([
            "reliability_report",
            "--preview-rows",
            "25",
            "--export",
            "markdown",
            "--from",
            "2024-04-01",
        ]);
        config.merge_with_args(&args);
        assert_eq!(config.general.preview_rows, 25);
        assert_eq!(config.report.export_format, "markdown");
        assert_eq!(config.report.period_start.as_deref(), Some("2024-04-01"));
    }
}
