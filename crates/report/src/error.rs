//! Error types for the report pipeline

use thiserror::Error;

use crate::format::FormatKey;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Common(#[from] stepview_common::Error),

    #[error("Event out of order: {0}")]
    OutOfOrder(String),

    #[error("No format for {0}")]
    MissingFormat(FormatKey),

    #[error("Invalid style '{spec}': {reason}")]
    InvalidStyle { spec: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
