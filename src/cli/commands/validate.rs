//! Validate command implementation

use super::load_record;
use crate::cli::error::CliError;
use std::path::Path;

/// Handle the validate command
///
/// Parsing rejects unknown status values; `validate` then checks the
/// required identity and submission fields.
pub fn handle_validate(input: &Path) -> Result<(), CliError> {
    let record = load_record(input)?;
    record.validate()?;

    println!("Validation successful");
    Ok(())
}
