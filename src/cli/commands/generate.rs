//! Generate and filename command handlers

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

use super::load_record;
use crate::cli::error::CliError;
use crate::config::{CONFIG_FILENAME, ReportConfig};
use crate::export::{AdmissionReportGenerator, filename_for};

/// Arguments for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input: PathBuf,
    /// Overrides `[output] directory`
    pub output_dir: Option<PathBuf>,
    /// Report date; today (UTC) when unset
    pub date: Option<NaiveDate>,
    /// Explicit config file. Otherwise `.admission-report.toml` in the
    /// current directory is used if present.
    pub config: Option<PathBuf>,
    pub force: bool,
}

/// Arguments for the filename command
#[derive(Debug, Clone)]
pub struct FilenameArgs {
    pub input: PathBuf,
    pub date: Option<NaiveDate>,
}

/// Load the configuration named on the command line, or the default one
pub fn load_config(path: Option<&Path>) -> Result<ReportConfig, CliError> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.to_path_buf()));
            }
            Ok(ReportConfig::load_file(path)?)
        }
        None => Ok(ReportConfig::load_file(Path::new(CONFIG_FILENAME))?),
    }
}

/// Handle the generate command. Returns the path of the written report.
pub async fn handle_generate(args: &GenerateArgs) -> Result<PathBuf, CliError> {
    let record = load_record(&args.input)?;
    let config = load_config(args.config.as_deref())?;

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));
    let overwrite = args.force || config.output.overwrite;

    // Fail before any fetch if the target is already taken
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let target = output_dir.join(filename_for(&record.application_id, date));
    if target.exists() && !overwrite {
        return Err(CliError::InvalidArgument(format!(
            "Output file exists: {}. Use --force to overwrite.",
            target.display()
        )));
    }

    let generator = AdmissionReportGenerator::from_config(config)?;
    let report = generator.generate_on(&record, date).await?;
    for kind in &report.skipped_documents {
        info!("Left out {} (image unavailable)", kind.label());
    }

    Ok(report.save_to(&output_dir, overwrite)?)
}

/// Handle the filename command
pub fn handle_filename(args: &FilenameArgs) -> Result<String, CliError> {
    let record = load_record(&args.input)?;
    record.validate()?;
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(filename_for(&record.application_id, date))
}
