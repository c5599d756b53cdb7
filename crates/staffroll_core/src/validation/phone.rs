//! Mobile phone number format check.

use super::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

static MOBILE_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^9[0-9]{8}$").expect("valid phone regex"));

/// Accepts exactly nine ASCII digits starting with `9`.
pub fn validate_phone(input: &str) -> ValidationResult {
    check_phone(input).into()
}

/// Same as [`validate_phone`] but in `Result` form.
pub fn check_phone(input: &str) -> Result<(), ValidationError> {
    if MOBILE_PHONE_RE.is_match(input) {
        Ok(())
    } else {
        Err(ValidationError::Format)
    }
}
