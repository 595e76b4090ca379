//! Command-line interface argument parsing.

use crate::access::{Role, View};
use crate::filter::{FilterSelection, Level};
use crate::output::ExportFormat;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level as LogLevel;

/// Distribution reliability reports (SAIDI, SAIFI, CAIDI, MAIFI, CAIFI)
///
/// Without --view the tool opens an interactive menu after login.
///
/// Examples:
///   reliability_report -u asha -p secret -r central --view dashboard
///   reliability_report -u asha -p secret -r division --view feeders --circle thrissur
///   reliability_report -u asha -p secret -r central --view interruptions --from 2024-03-01 --to 2024-04-30 --export csv
///   reliability_report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Username for the session
    #[arg(short, long)]
    pub username: Option<String>,

    /// Password for the session
    #[arg(short, long, env = "RELIABILITY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Role that decides which views are available
    #[arg(short, long, value_name = "ROLE")]
    pub role: Option<Role>,

    /// Render one view and exit
    #[arg(long, value_name = "VIEW")]
    pub view: Option<View>,

    /// Region id filter
    #[arg(long, value_name = "ID")]
    pub region: Option<String>,

    /// Circle id filter
    #[arg(long, value_name = "ID")]
    pub circle: Option<String>,

    /// Division id filter
    #[arg(long, value_name = "ID")]
    pub division: Option<String>,

    /// Sub-division id filter
    #[arg(long, value_name = "ID")]
    pub sub_division: Option<String>,

    /// Section id filter
    #[arg(long, value_name = "ID")]
    pub section: Option<String>,

    /// First day of the interruption log window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Last day of the interruption log window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Directory of CSV files to use instead of the built-in sample
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Export the rendered view's tables in this format
    #[arg(long, value_name = "FORMAT")]
    pub export: Option<ExportFormat>,

    /// Directory for exported files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Rows shown per table on the console
    #[arg(long, value_name = "COUNT")]
    pub preview_rows: Option<usize>,

    /// Number of critical feeders on the dashboard
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .reliability.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .reliability.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(format!("--from {} is after --to {}", from, to));
            }
        }
        if self.view.is_some() && (self.username.is_none() || self.password.is_none() || self.role.is_none()) {
            return Err("--view needs --username, --password and --role".to_string());
        }
        Ok(())
    }

    pub fn log_level(&self) -> LogLevel {
        if self.quiet {
            LogLevel::ERROR
        } else if self.verbose {
            LogLevel::DEBUG
        } else {
            LogLevel::WARN
        }
    }

    /// Default `tracing` directive when `RUST_LOG` is unset. `--quiet` beats
    /// a config file that asks for verbose output.
    pub fn log_directive(&self, config_verbose: bool) -> String {
        let level = if !self.quiet && config_verbose {
            LogLevel::DEBUG
        } else {
            self.log_level()
        };
        level.as_str().to_lowercase()
    }

    /// The filter flags applied top-down, so each level keeps the
    /// reset-on-change behavior.
    pub fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::new();
        let flags = [
            (Level::Region, &self.region),
            (Level::Circle, &self.circle),
            (Level::Division, &self.division),
            (Level::SubDivision, &self.sub_division),
            (Level::Section, &self.section),
        ];
        for (level, value) in flags {
            if let Some(v) = value {
                selection.set(level, v.as_str());
            }
        }
        selection
    }
}
