//! Admission report generator
//!
//! Lays out an [`AdmissionRecord`] section by section, fetches and embeds the
//! uploaded document images one at a time, and serializes the result.

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::ExportError;
use super::layout::{Cursor, DocumentCanvas};
use super::metrics::Font;
use super::pdf::{DocumentInfo, PdfWriter};
use crate::config::ReportConfig;
use crate::fetch::{Bitmap, FetchError, ImageFetcher, rasterize};
use crate::models::admission::{AdmissionRecord, Attachment, DocumentKind, parse_timestamp, present};

#[cfg(feature = "http-fetch")]
use crate::fetch::HttpImageFetcher;

/// A rendered report
#[derive(Debug, Clone)]
#[must_use = "a report holds the rendered PDF and should be saved or returned"]
pub struct ReportOutput {
    /// Complete PDF file
    pub bytes: Vec<u8>,
    /// `admission_{applicationId}_{YYYY-MM-DD}.pdf`
    pub filename: String,
    pub page_count: usize,
    pub title: String,
    /// Documents whose image could not be fetched or decoded
    pub skipped_documents: Vec<DocumentKind>,
}

impl ReportOutput {
    /// PDF bytes as standard base64
    pub fn pdf_base64(&self) -> String {
        base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &self.bytes)
    }

    /// Write the PDF into `dir` under its report filename.
    ///
    /// The directory is created if needed. An existing file is only replaced
    /// when `overwrite` is set.
    pub fn save_to(&self, dir: &Path, overwrite: bool) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir).map_err(|e| {
            ExportError::IoError(format!("Failed to create {}: {}", dir.display(), e))
        })?;

        let path = dir.join(&self.filename);
        if path.exists() && !overwrite {
            return Err(ExportError::IoError(format!(
                "{} already exists",
                path.display()
            )));
        }

        std::fs::write(&path, &self.bytes).map_err(|e| {
            ExportError::IoError(format!("Failed to write {}: {}", path.display(), e))
        })?;
        info!("Wrote admission report to {}", path.display());
        Ok(path)
    }
}

/// Report filename for an application on a given date.
///
/// Path separators and control characters in the ID are replaced with `_`
/// so the name always stays inside the target directory.
pub fn filename_for(application_id: &str, date: NaiveDate) -> String {
    let id: String = application_id
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("admission_{}_{}.pdf", id, date.format("%Y-%m-%d"))
}

type Section = fn(&mut DocumentCanvas, Cursor, &AdmissionRecord) -> Cursor;

/// Text sections following the header, in report order
const SECTIONS: [Section; 9] = [
    personal_section,
    address_section,
    guardian_section,
    local_guardian_section,
    academic_section,
    program_section,
    status_section,
    payment_details_section,
    payment_summary_section,
];

/// Generates admission reports, fetching document images through `F`
pub struct AdmissionReportGenerator<F: ImageFetcher> {
    config: ReportConfig,
    fetcher: F,
}

#[cfg(feature = "http-fetch")]
impl AdmissionReportGenerator<HttpImageFetcher> {
    /// Generator that fetches images over HTTP using the `[fetch]` settings
    pub fn from_config(config: ReportConfig) -> Result<Self, ExportError> {
        let fetcher = HttpImageFetcher::new(&config.fetch)
            .map_err(|e| ExportError::ExportError(e.to_string()))?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: ImageFetcher> AdmissionReportGenerator<F> {
    pub fn with_fetcher(config: ReportConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Render `record`, naming the file after today's UTC date
    pub async fn generate(&self, record: &AdmissionRecord) -> Result<ReportOutput, ExportError> {
        self.generate_on(record, Utc::now().date_naive()).await
    }

    /// Render `record` as of `date`. Identical inputs and identical fetched
    /// images give byte-identical output.
    ///
    /// Required fields are checked before any image is fetched.
    pub async fn generate_on(
        &self,
        record: &AdmissionRecord,
        date: NaiveDate,
    ) -> Result<ReportOutput, ExportError> {
        let submitted = record.validate()?;
        let application_id = record.application_id.trim();
        let title = format!("{} - {}", self.config.report.title, application_id);

        let mut canvas = DocumentCanvas::new(&self.config.layout);
        let mut cursor = canvas.start();

        let layout = &self.config.layout;
        cursor = canvas.centered_text(
            cursor,
            &self.config.report.title,
            Font::HelveticaBold,
            layout.title_font_size,
        );
        cursor = canvas.centered_text(
            cursor,
            &format!("Application ID: {}", application_id),
            Font::Helvetica,
            layout.body_font_size,
        );
        cursor = canvas.centered_text(
            cursor,
            &format!("Submitted on: {}", submitted.format("%d %B %Y")),
            Font::Helvetica,
            layout.body_font_size,
        );
        cursor.y += layout.section_gap_mm;

        cursor = SECTIONS
            .iter()
            .fold(cursor, |cursor, section| section(&mut canvas, cursor, record));

        let skipped = self.embed_documents(&mut canvas, cursor, record).await;

        let page_count = canvas.page_count();
        let info = DocumentInfo {
            title: title.clone(),
            producer: self.config.report.producer.clone(),
            created: date,
        };
        let bytes = PdfWriter::new().write(canvas, &info);

        info!(
            "Generated admission report for {} ({} pages, {} documents skipped)",
            application_id,
            page_count,
            skipped.len()
        );

        Ok(ReportOutput {
            bytes,
            filename: filename_for(application_id, date),
            page_count,
            title,
            skipped_documents: skipped,
        })
    }

    /// Fetch, decode and draw each uploaded document in order. Failures are
    /// logged and the document is left out entirely.
    async fn embed_documents(
        &self,
        canvas: &mut DocumentCanvas,
        cursor: Cursor,
        record: &AdmissionRecord,
    ) -> Vec<DocumentKind> {
        let attachments = record.attachments();
        let mut skipped = Vec::new();
        if !attachments
            .iter()
            .any(|a| matches!(a, Attachment::Present { .. }))
        {
            return skipped;
        }

        let mut cursor = canvas.section_header(cursor, "Uploaded Documents");
        for attachment in attachments {
            let Attachment::Present { kind, url } = attachment else {
                continue;
            };
            match self.load_image(url).await {
                Ok(bitmap) => cursor = canvas.image_block(cursor, kind.label(), bitmap),
                Err(e) => {
                    warn!("Failed to load {} from {}: {}", kind.label(), url, e);
                    skipped.push(kind);
                }
            }
        }
        skipped
    }

    async fn load_image(&self, url: &str) -> Result<Bitmap, FetchError> {
        let bytes = self.fetcher.fetch(url).await?;
        rasterize(&bytes)
    }
}

fn personal_section(canvas: &mut DocumentCanvas, cursor: Cursor, r: &AdmissionRecord) -> Cursor {
    let full_name = r.full_name();
    let cursor = canvas.section_header(cursor, "Personal Information");
    [
        ("Full Name", full_name.as_deref()),
        ("Email", present(&r.email)),
        ("Phone", present(&r.phone)),
        ("Date of Birth", present(&r.date_of_birth)),
        ("Gender", present(&r.gender)),
        ("Religion", present(&r.religion)),
        ("National ID Number", present(&r.national_id_number)),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, value))
}

fn address_section(canvas: &mut DocumentCanvas, cursor: Cursor, r: &AdmissionRecord) -> Cursor {
    let cursor = canvas.section_header(cursor, "Address Information");
    [
        ("Permanent Address", present(&r.permanent_address)),
        ("Temporary Address", present(&r.temporary_address)),
        ("City", present(&r.city)),
        ("State", present(&r.state)),
        ("Postal Code", present(&r.postal_code)),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, value))
}

fn guardian_section(canvas: &mut DocumentCanvas, cursor: Cursor, r: &AdmissionRecord) -> Cursor {
    let income = r.annual_income_display();
    let cursor = canvas.section_header(cursor, "Guardian Information");
    [
        ("Father's Name", present(&r.father_name)),
        ("Father's Phone", present(&r.father_phone)),
        ("Father's Occupation", present(&r.father_occupation)),
        ("Father's Qualification", present(&r.father_qualification)),
        ("Mother's Name", present(&r.mother_name)),
        ("Mother's Phone", present(&r.mother_phone)),
        ("Mother's Occupation", present(&r.mother_occupation)),
        ("Mother's Qualification", present(&r.mother_qualification)),
        ("Annual Income", income.as_deref()),
        ("Guardian Address", present(&r.guardian_address)),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, value))
}

fn local_guardian_section(
    canvas: &mut DocumentCanvas,
    cursor: Cursor,
    r: &AdmissionRecord,
) -> Cursor {
    if !r.has_local_guardian() {
        return cursor;
    }
    let cursor = canvas.section_header(cursor, "Local Guardian");
    [
        ("Name", present(&r.local_guardian_name)),
        ("Phone", present(&r.local_guardian_phone)),
        ("Relation", present(&r.local_guardian_relation)),
        ("Address", present(&r.local_guardian_address)),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, value))
}

fn academic_section(canvas: &mut DocumentCanvas, cursor: Cursor, r: &AdmissionRecord) -> Cursor {
    let mut cursor = canvas.section_header(cursor, "Academic Information");
    for cluster in r.academic_clusters() {
        let prefix = cluster.level.prefix();
        let labels = [
            format!("{} {}", prefix, cluster.level.institution_label()),
            format!("{} Stream", prefix),
            format!("{} Percentage", prefix),
            format!("{} Year", prefix),
        ];
        let values = [
            cluster.institution,
            cluster.stream,
            cluster.percentage,
            cluster.year,
        ];
        for (label, value) in labels.iter().zip(values) {
            cursor = canvas.field(cursor, label, value);
        }
    }
    cursor
}

fn program_section(canvas: &mut DocumentCanvas, cursor: Cursor, r: &AdmissionRecord) -> Cursor {
    let cursor = canvas.section_header(cursor, "Program Information");
    [
        ("Program Category", present(&r.program_category)),
        ("Program Name", present(&r.program_name)),
        ("Program Type", present(&r.program_type)),
        ("Specialization", present(&r.specialization)),
        ("Campus", present(&r.campus)),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, value))
}

/// Timestamp as `YYYY-MM-DD HH:MM UTC`, or the raw string if it does not parse
fn timestamp_display(value: &str) -> String {
    match parse_timestamp(value) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => value.to_string(),
    }
}

fn status_section(canvas: &mut DocumentCanvas, cursor: Cursor, r: &AdmissionRecord) -> Cursor {
    let submitted = timestamp_display(r.submitted_at.trim());
    let created = present(&r.created_at).map(timestamp_display);
    let updated = present(&r.updated_at).map(timestamp_display);

    let cursor = canvas.section_header(cursor, "Application Status");
    [
        ("Status", Some(r.application_status.as_str())),
        ("Submitted At", Some(submitted.as_str())),
        ("Created At", created.as_deref()),
        ("Last Updated", updated.as_deref()),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, value))
}

fn payment_details_section(
    canvas: &mut DocumentCanvas,
    cursor: Cursor,
    r: &AdmissionRecord,
) -> Cursor {
    let complete = if r.payment_complete { "Yes" } else { "No" };
    let cursor = canvas.section_header(cursor, "Payment Details");
    let cursor = canvas.field(cursor, "Payment Status", Some(r.payment_status.as_str()));
    canvas.field(cursor, "Payment Complete", Some(complete))
}

fn payment_summary_section(
    canvas: &mut DocumentCanvas,
    cursor: Cursor,
    r: &AdmissionRecord,
) -> Cursor {
    let cursor = canvas.section_header(cursor, "Payment Summary");
    [
        ("Application Fee Status", r.fee_status_label()),
        ("Payment Method", r.payment_status.method_label()),
        ("Application Processing", r.application_status.processing_label()),
    ]
    .into_iter()
    .fold(cursor, |c, (label, value)| canvas.field(c, label, Some(value)))
}
