//! Generate command tests

use admission_report::cli::commands::generate::{GenerateArgs, handle_generate};
use admission_report::cli::error::CliError;
use base64::Engine;
use chrono::NaiveDate;
use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use std::path::Path;

fn photo_data_uri() -> String {
    let mut buf = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, Rgba([20, 120, 200, 128])))
        .write_to(&mut buf, ImageOutputFormat::Png)
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(buf.into_inner())
    )
}

fn write_record(dir: &Path) -> std::path::PathBuf {
    let record = serde_json::json!({
        "applicationId": "APP123",
        "firstName": "Asha",
        "lastName": "Verma",
        "paymentStatus": "completed",
        "applicationStatus": "approved",
        "paymentComplete": true,
        "profilePhoto": photo_data_uri(),
        "signature": "ftp://files.example.edu/sig.png",
        "submittedAt": "2024-03-14T09:30:00.000Z"
    });
    let path = dir.join("record.json");
    std::fs::write(&path, record.to_string()).unwrap();
    path
}

fn args(input: &Path, output_dir: &Path, force: bool) -> GenerateArgs {
    GenerateArgs {
        input: input.to_path_buf(),
        output_dir: Some(output_dir.to_path_buf()),
        date: NaiveDate::from_ymd_opt(2024, 3, 15),
        config: None,
        force,
    }
}

#[tokio::test]
async fn test_generate_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_record(dir.path());
    let out = dir.path().join("reports");

    let path = handle_generate(&args(&input, &out, false)).await.unwrap();
    assert_eq!(path, out.join("admission_APP123_2024-03-15.pdf"));

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    // Embedded photo with its soft mask; the ftp signature is skipped
    let pdf = String::from_utf8_lossy(&bytes);
    assert!(pdf.contains("/SMask"));
    assert_eq!(pdf.matches(" Do\n").count(), 1);
}

#[tokio::test]
async fn test_generate_refuses_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_record(dir.path());
    let out = dir.path().join("reports");

    handle_generate(&args(&input, &out, false)).await.unwrap();
    let again = handle_generate(&args(&input, &out, false)).await;
    assert!(matches!(again, Err(CliError::InvalidArgument(_))));

    assert!(handle_generate(&args(&input, &out, true)).await.is_ok());
}

#[tokio::test]
async fn test_generate_uses_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_record(dir.path());
    let config = dir.path().join("report.toml");
    std::fs::write(
        &config,
        "[layout]\npage_size = \"letter\"\n\n[report]\ntitle = \"Hostel Admission\"\n",
    )
    .unwrap();

    let mut args = args(&input, &dir.path().join("out"), false);
    args.config = Some(config);
    let path = handle_generate(&args).await.unwrap();

    let pdf = String::from_utf8_lossy(&std::fs::read(path).unwrap()).into_owned();
    assert!(pdf.contains("/MediaBox [0 0 612.00 792.00]"));
    assert!(pdf.contains("(Hostel Admission) Tj"));
}

#[tokio::test]
async fn test_generate_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_record(dir.path());
    let mut args = args(&input, dir.path(), false);
    args.config = Some(dir.path().join("nope.toml"));
    assert!(matches!(
        handle_generate(&args).await,
        Err(CliError::FileNotFound(_))
    ));
}
