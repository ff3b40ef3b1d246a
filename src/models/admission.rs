//! Admission application record
//!
//! The flat record the dashboard keeps for each applicant, as returned by the
//! admissions REST endpoint. Keys are camelCase on the wire:
//!
//! ```json
//! {
//!   "_id": "65f1c0ffee",
//!   "applicationId": "APP123",
//!   "firstName": "Asha",
//!   "lastName": "Verma",
//!   "paymentStatus": "completed",
//!   "applicationStatus": "enrolled",
//!   "paymentComplete": true,
//!   "profilePhoto": "https://cdn.example.edu/uploads/asha.png",
//!   "submittedAt": "2024-03-14T09:30:00.000Z"
//! }
//! ```
//!
//! Only `applicationId` and `submittedAt` are required. Every other field may
//! be missing, and a blank string is treated the same as a missing one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::export::ExportError;

/// Payment state reported by the payment gateway callback
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No payment received yet
    #[default]
    Pending,
    /// Gateway confirmed the payment
    Completed,
    /// Gateway reported a failure
    Failed,
}

impl PaymentStatus {
    /// Wire representation, as stored by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    /// Payment method shown in the payment summary
    pub fn method_label(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "Online Payment",
            PaymentStatus::Pending | PaymentStatus::Failed => "Not Specified",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!(
                "Unknown payment status: {}. Use 'pending', 'completed' or 'failed'.",
                s
            )),
        }
    }
}

/// Review state of the application
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Enrolled,
}

impl ApplicationStatus {
    /// Wire representation, as stored by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Enrolled => "enrolled",
        }
    }

    /// Status with its first letter upper-cased, as shown under
    /// "Application Processing"
    pub fn processing_label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Enrolled => "Enrolled",
        }
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "enrolled" => Ok(ApplicationStatus::Enrolled),
            _ => Err(format!(
                "Unknown application status: {}. Use 'pending', 'approved', 'rejected' or 'enrolled'.",
                s
            )),
        }
    }
}

/// Uploaded document slots, in the order they appear in the report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    ProfilePhoto,
    Signature,
    NationalIdScan,
    TenthMarksheet,
    TwelfthMarksheet,
    DiplomaMarksheet,
    GraduationMarksheet,
}

impl DocumentKind {
    /// All slots in document order
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::ProfilePhoto,
        DocumentKind::Signature,
        DocumentKind::NationalIdScan,
        DocumentKind::TenthMarksheet,
        DocumentKind::TwelfthMarksheet,
        DocumentKind::DiplomaMarksheet,
        DocumentKind::GraduationMarksheet,
    ];

    /// Caption drawn above the embedded image
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::ProfilePhoto => "Profile Photo",
            DocumentKind::Signature => "Signature",
            DocumentKind::NationalIdScan => "National ID",
            DocumentKind::TenthMarksheet => "10th Marksheet",
            DocumentKind::TwelfthMarksheet => "12th Marksheet",
            DocumentKind::DiplomaMarksheet => "Diploma Marksheet",
            DocumentKind::GraduationMarksheet => "Graduation Marksheet",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One uploaded-document slot, resolved against a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment<'a> {
    Present { kind: DocumentKind, url: &'a str },
    Absent(DocumentKind),
}

impl Attachment<'_> {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Attachment::Present { kind, .. } | Attachment::Absent(kind) => *kind,
        }
    }
}

/// Education levels carried by the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationLevel {
    Tenth,
    Twelfth,
    Diploma,
    Graduation,
}

impl EducationLevel {
    /// Prefix for the level's field labels ("10th Board", "Diploma Year")
    pub fn prefix(&self) -> &'static str {
        match self {
            EducationLevel::Tenth => "10th",
            EducationLevel::Twelfth => "12th",
            EducationLevel::Diploma => "Diploma",
            EducationLevel::Graduation => "Graduation",
        }
    }

    /// Label for the awarding body field
    pub fn institution_label(&self) -> &'static str {
        match self {
            EducationLevel::Tenth | EducationLevel::Twelfth => "Board",
            EducationLevel::Diploma => "Institution",
            EducationLevel::Graduation => "University",
        }
    }
}

/// Borrowed view of one education level's fields
#[derive(Debug, Clone, Copy)]
pub struct AcademicCluster<'a> {
    pub level: EducationLevel,
    pub institution: Option<&'a str>,
    pub stream: Option<&'a str>,
    pub percentage: Option<&'a str>,
    pub year: Option<&'a str>,
}

/// Admission application as stored by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRecord {
    /// Backend document identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Public application number, used in the report filename
    #[serde(default)]
    pub application_id: String,

    // Personal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id_number: Option<String>,

    // Address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    // Guardians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_qualification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_qualification: Option<String>,
    /// Household income per year, in rupees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_guardian_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_guardian_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_guardian_relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_guardian_address: Option<String>,

    // Academics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twelfth_board: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twelfth_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twelfth_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twelfth_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diploma_institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diploma_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diploma_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diploma_year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_stream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_percentage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<String>,

    // Program
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,

    // Status
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    #[serde(default)]
    pub payment_complete: bool,

    // Uploaded documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id_scan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenth_marksheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twelfth_marksheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diploma_marksheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_marksheet: Option<String>,

    // Timestamps
    #[serde(default)]
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Treat blank strings as missing. A present value is returned as stored,
/// surrounding whitespace included.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 datetimes and bare dates.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl AdmissionRecord {
    /// Create a record with only the required fields set
    pub fn new(application_id: impl Into<String>, submitted_at: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            submitted_at: submitted_at.into(),
            ..Default::default()
        }
    }

    /// Check the fields a report cannot be produced without.
    ///
    /// Returns the parsed submission time so callers do not parse twice.
    pub fn validate(&self) -> Result<DateTime<Utc>, ExportError> {
        if self.application_id.trim().is_empty() {
            return Err(ExportError::MissingField("applicationId".to_string()));
        }
        if self.submitted_at.trim().is_empty() {
            return Err(ExportError::MissingField("submittedAt".to_string()));
        }
        parse_timestamp(&self.submitted_at).ok_or_else(|| {
            ExportError::InvalidDate(format!("submittedAt: '{}'", self.submitted_at))
        })
    }

    /// First, middle and last name joined with single spaces
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(present)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Annual income formatted without a trailing `.0` for whole amounts
    pub fn annual_income_display(&self) -> Option<String> {
        let income = self.annual_income?;
        if !income.is_finite() {
            return None;
        }
        if income.fract() == 0.0 {
            Some(format!("{:.0}", income))
        } else {
            Some(format!("{:.2}", income))
        }
    }

    /// Academic clusters in report order. Diploma and graduation are only
    /// included when their institution is filled in.
    pub fn academic_clusters(&self) -> Vec<AcademicCluster<'_>> {
        let mut clusters = vec![
            AcademicCluster {
                level: EducationLevel::Tenth,
                institution: present(&self.tenth_board),
                stream: present(&self.tenth_stream),
                percentage: present(&self.tenth_percentage),
                year: present(&self.tenth_year),
            },
            AcademicCluster {
                level: EducationLevel::Twelfth,
                institution: present(&self.twelfth_board),
                stream: present(&self.twelfth_stream),
                percentage: present(&self.twelfth_percentage),
                year: present(&self.twelfth_year),
            },
        ];
        if let Some(institution) = present(&self.diploma_institution) {
            clusters.push(AcademicCluster {
                level: EducationLevel::Diploma,
                institution: Some(institution),
                stream: present(&self.diploma_stream),
                percentage: present(&self.diploma_percentage),
                year: present(&self.diploma_year),
            });
        }
        if let Some(university) = present(&self.graduation_university) {
            clusters.push(AcademicCluster {
                level: EducationLevel::Graduation,
                institution: Some(university),
                stream: present(&self.graduation_stream),
                percentage: present(&self.graduation_percentage),
                year: present(&self.graduation_year),
            });
        }
        clusters
    }

    /// Whether a local guardian was named
    pub fn has_local_guardian(&self) -> bool {
        present(&self.local_guardian_name).is_some()
    }

    /// URL stored for a document slot, if any
    pub fn document_url(&self, kind: DocumentKind) -> Option<&str> {
        let value = match kind {
            DocumentKind::ProfilePhoto => &self.profile_photo,
            DocumentKind::Signature => &self.signature,
            DocumentKind::NationalIdScan => &self.national_id_scan,
            DocumentKind::TenthMarksheet => &self.tenth_marksheet,
            DocumentKind::TwelfthMarksheet => &self.twelfth_marksheet,
            DocumentKind::DiplomaMarksheet => &self.diploma_marksheet,
            DocumentKind::GraduationMarksheet => &self.graduation_marksheet,
        };
        present(value).map(str::trim)
    }

    /// Every document slot in report order
    pub fn attachments(&self) -> Vec<Attachment<'_>> {
        DocumentKind::ALL
            .iter()
            .map(|&kind| match self.document_url(kind) {
                Some(url) => Attachment::Present { kind, url },
                None => Attachment::Absent(kind),
            })
            .collect()
    }

    /// "Paid" once the fee has been collected
    pub fn fee_status_label(&self) -> &'static str {
        if self.payment_complete {
            "Paid"
        } else {
            "Pending"
        }
    }

    /// Parse a record from JSON
    pub fn from_json(content: &str) -> Result<Self, ExportError> {
        serde_json::from_str(content).map_err(|e| {
            ExportError::SerializationError(format!("Failed to parse admission record: {}", e))
        })
    }

    /// Parse a record from YAML
    pub fn from_yaml(content: &str) -> Result<Self, ExportError> {
        serde_yaml::from_str(content).map_err(|e| {
            ExportError::SerializationError(format!("Failed to parse admission record: {}", e))
        })
    }
}
