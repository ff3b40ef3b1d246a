//! CLI tests module

#[cfg(feature = "cli")]
pub mod generate_tests;
#[cfg(feature = "cli")]
pub mod validate_tests;
