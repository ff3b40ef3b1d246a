//! CLI command implementations

pub mod generate;
pub mod validate;

use crate::cli::error::CliError;
use crate::models::AdmissionRecord;
use std::path::Path;

/// Read an admission record from a `.json`, `.yaml` or `.yml` file
pub fn load_record(path: &Path) -> Result<AdmissionRecord, CliError> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let record = match extension.as_deref() {
        Some("json") => AdmissionRecord::from_json(&content)?,
        Some("yaml") | Some("yml") => AdmissionRecord::from_yaml(&content)?,
        _ => return Err(CliError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(record)
}
