use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{entity} '{id}' references unknown {target} '{missing}'")]
    DanglingReference {
        entity: &'static str,
        id: String,
        target: &'static str,
        missing: String,
    },

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Login rejected: username, password and a known role are required")]
    LoginRejected,

    #[error("Role '{role}' may not open the {view} view")]
    AccessDenied { role: String, view: String },

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
