//! Export functionality
//!
//! Renders admission records to PDF:
//! - `metrics`: base-14 font widths, measurement and word-wrap
//! - `layout`: page geometry, cursor and drawing primitives
//! - `pdf`: PDF 1.4 serialization
//! - `admission`: the report generator that ties them together

pub mod admission;
pub mod layout;
pub mod metrics;
pub mod pdf;

/// Error during export
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ExportError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Export error: {0}")]
    ExportError(String),
}

// Re-export for convenience
pub use admission::{AdmissionReportGenerator, ReportOutput, filename_for};
pub use layout::{Cursor, DocumentCanvas, PageGeometry, fit_image};
pub use metrics::{Font, wrap_text};
pub use pdf::{DocumentInfo, PdfWriter};
