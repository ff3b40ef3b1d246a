//! Admission Report SDK - PDF admission reports for applicant records
//!
//! Provides:
//! - The admission record model with closed status enums
//! - Page layout with glyph-aware word-wrap and pagination
//! - A dependency-light PDF writer with embedded document images
//! - Image fetching over HTTP or from `data:` URIs
//! - TOML configuration with environment overrides
//!
//! ```no_run
//! use admission_report::{AdmissionRecord, AdmissionReportGenerator, ReportConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let record = AdmissionRecord::from_json(&std::fs::read_to_string("record.json")?)?;
//! let generator = AdmissionReportGenerator::from_config(ReportConfig::default())?;
//! let report = generator.generate(&record).await?;
//! report.save_to(std::path::Path::new("reports"), false)?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod export;
pub mod fetch;
pub mod models;

// Re-export commonly used types
pub use config::{ConfigError, PageSize, ReportConfig};
pub use export::{AdmissionReportGenerator, ExportError, ReportOutput, filename_for};
#[cfg(feature = "http-fetch")]
pub use fetch::HttpImageFetcher;
pub use fetch::{Bitmap, FetchError, ImageFetcher};

// Re-export models
pub use models::{
    AdmissionRecord, ApplicationStatus, Attachment, DocumentKind, EducationLevel, PaymentStatus,
};
