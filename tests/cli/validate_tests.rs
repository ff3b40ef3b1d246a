//! Validate and filename command tests

use admission_report::cli::commands::generate::{FilenameArgs, handle_filename};
use admission_report::cli::commands::load_record;
use admission_report::cli::commands::validate::handle_validate;
use admission_report::cli::error::CliError;
use chrono::NaiveDate;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn record_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_validate_json_record() {
    let file = record_file(
        ".json",
        r#"{"applicationId": "APP123", "submittedAt": "2024-03-14T09:30:00Z", "paymentStatus": "completed"}"#,
    );
    assert!(handle_validate(file.path()).is_ok());
}

#[test]
fn test_validate_yaml_record() {
    let file = record_file(
        ".yaml",
        "applicationId: APP123\nsubmittedAt: 2024-03-14\napplicationStatus: approved\n",
    );
    let record = load_record(file.path()).unwrap();
    assert_eq!(record.application_id, "APP123");
    assert!(handle_validate(file.path()).is_ok());
}

#[test]
fn test_validate_rejects_missing_submission() {
    let file = record_file(".json", r#"{"applicationId": "APP123"}"#);
    assert!(matches!(
        handle_validate(file.path()),
        Err(CliError::ExportError(_))
    ));
}

#[test]
fn test_validate_rejects_unknown_status() {
    let file = record_file(
        ".json",
        r#"{"applicationId": "APP1", "submittedAt": "2024-03-14", "paymentStatus": "refunded"}"#,
    );
    assert!(handle_validate(file.path()).is_err());
}

#[test]
fn test_unsupported_extension() {
    let file = record_file(".csv", "applicationId,submittedAt\n");
    assert!(matches!(
        load_record(file.path()),
        Err(CliError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_record(&dir.path().join("absent.json")),
        Err(CliError::FileNotFound(_))
    ));
}

#[test]
fn test_filename_command() {
    let file = record_file(
        ".yml",
        "applicationId: APP77\nsubmittedAt: 2024-03-14T09:30:00Z\n",
    );
    let args = FilenameArgs {
        input: file.path().to_path_buf(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1),
    };
    assert_eq!(handle_filename(&args).unwrap(), "admission_APP77_2024-06-01.pdf");
}
