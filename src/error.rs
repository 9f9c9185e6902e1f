use rootcause::prelude::Report;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogKickerError {
    #[error("Failed to read log file: {0}")]
    FileRead(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    JsonEncode(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Start time {start} is after end time {end}")]
    InvertedRange { start: String, end: String },

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}

pub type Result<T> = std::result::Result<T, Report<LogKickerError>>;
