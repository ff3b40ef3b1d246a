//! CLI-specific error types

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::fetch::FetchError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Unsupported record format for {0}. Use .json, .yaml or .yml")]
    UnsupportedFormat(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("Fetch error: {0}")]
    FetchError(#[from] FetchError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}
