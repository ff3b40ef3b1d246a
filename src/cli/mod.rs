//! Command-line host for the report generator

pub mod commands;
pub mod error;
