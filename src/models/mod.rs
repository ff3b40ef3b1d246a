//! Models module for the SDK
//!
//! Defines the admission record and its closed status enums.

pub mod admission;

pub use admission::{
    AcademicCluster, AdmissionRecord, ApplicationStatus, Attachment, DocumentKind,
    EducationLevel, PaymentStatus,
};
