//! Validation utilities.

use crate::{FieldError, KedaiError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `KedaiError` on failure.
    fn validate_request(&self) -> Result<(), KedaiError> {
        self.validate().map_err(validation_errors_to_kedai_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();
    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    field_errors
}

/// Converts `validator::ValidationErrors` to `KedaiError`.
#[must_use]
pub fn validation_errors_to_kedai_error(errors: ValidationErrors) -> KedaiError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    KedaiError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a cache region or channel name: `[A-Za-z0-9_.-]`, at most 64 chars.
    pub fn valid_name(name: &str) -> Result<(), ValidationError> {
        if name.is_empty() {
            return Err(ValidationError::new("name_empty"));
        }
        if name.len() > 64 {
            return Err(ValidationError::new("name_too_long"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(ValidationError::new("name_invalid_characters"));
        }
        Ok(())
    }
}
