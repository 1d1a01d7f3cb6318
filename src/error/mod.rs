//! Error types for validation failures.
//!
//! Validation errors are data: they are collected into a [`ValidationResult`]
//! and never raised. Misuse of the API (bad format names, malformed patterns,
//! wrong rule arguments) is reported through the `thiserror` enums that live
//! next to the operation that can fail.

mod messages;
mod validation_error;

pub use messages::{interpolate, Attribute};
pub use validation_error::{ValidationError, ValidationErrors, ValidationResult};
