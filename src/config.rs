//! Report configuration file support
//!
//! Handles parsing of `.admission-report.toml` configuration files and
//! environment variable overrides.
//!
//! ```toml
//! [layout]
//! page_size = "a4"
//! margin_mm = 20.0
//!
//! [fetch]
//! timeout_secs = 30
//!
//! [output]
//! directory = "reports"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".admission-report.toml";

/// Environment variable for the output directory
pub const ENV_OUTPUT_DIR: &str = "ADMISSION_REPORT_OUTPUT_DIR";

/// Environment variable for the image fetch timeout (seconds)
pub const ENV_FETCH_TIMEOUT: &str = "ADMISSION_REPORT_FETCH_TIMEOUT";

/// Environment variable for the page size
pub const ENV_PAGE_SIZE: &str = "ADMISSION_REPORT_PAGE_SIZE";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("Failed to serialize config: {0}")]
    SerializationError(String),
}

/// Page size options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// A4 paper size (210 x 297 mm)
    #[default]
    A4,
    /// US Letter size (8.5 x 11 inches)
    Letter,
}

impl PageSize {
    /// Get page dimensions in millimeters (width, height)
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::Letter => (215.9, 279.4),
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            _ => Err(format!("Unknown page size: {}. Use 'a4' or 'letter'.", s)),
        }
    }
}

/// Page geometry and typography. All lengths are millimetres, font sizes
/// are points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSection {
    pub page_size: PageSize,
    pub margin_mm: f64,
    pub line_height_mm: f64,
    /// Extra space below a section header
    pub section_gap_mm: f64,
    /// Extra space below a label/value field
    pub field_gap_mm: f64,
    pub image_max_height_mm: f64,
    /// Space reserved for an image caption when deciding on a page break
    pub image_label_allowance_mm: f64,
    /// Extra space below an embedded image
    pub image_gap_mm: f64,
    pub title_font_size: f64,
    pub section_font_size: f64,
    pub body_font_size: f64,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_mm: 20.0,
            line_height_mm: 7.0,
            section_gap_mm: 3.0,
            field_gap_mm: 1.0,
            image_max_height_mm: 80.0,
            image_label_allowance_mm: 10.0,
            image_gap_mm: 5.0,
            title_font_size: 18.0,
            section_font_size: 14.0,
            body_font_size: 10.0,
        }
    }
}

/// Image fetch settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchSection {
    /// Per-request timeout. No timeout when unset.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: format!("admission-report/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where finished reports are written
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSection {
    pub directory: String,
    /// Replace an existing report with the same filename
    pub overwrite: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            overwrite: false,
        }
    }
}

/// Document metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportSection {
    /// Title drawn at the top of the first page and stored in the PDF info
    pub title: String,
    pub producer: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            title: "Admission Application".to_string(),
            producer: "Admission Report SDK".to_string(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.admission-report.toml` configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReportConfig {
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub report: ReportSection,
}

impl ReportConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.admission-report.toml` in the directory.
    /// Falls back to defaults if not found.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        Self::load_file(&dir.join(CONFIG_FILENAME))
    }

    /// Load configuration from an explicit file path, then apply environment
    /// overrides. A missing file yields the defaults.
    pub fn load_file(config_path: &Path) -> Result<Self, ConfigError> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;

            Self::parse(&content)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a directory
    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        let config_path = dir.join(CONFIG_FILENAME);
        let content = self.to_toml()?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_OUTPUT_DIR)
            && !dir.trim().is_empty()
        {
            self.output.directory = dir;
        }

        if let Some(timeout) = lookup(ENV_FETCH_TIMEOUT)
            && let Ok(secs) = timeout.trim().parse::<u64>()
        {
            self.fetch.timeout_secs = Some(secs);
        }

        if let Some(size) = lookup(ENV_PAGE_SIZE)
            && let Ok(page_size) = size.trim().parse()
        {
            self.layout.page_size = page_size;
        }
    }
}
