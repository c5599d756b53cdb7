//! E-mail address format check.
//!
//! Accepts dot-atom local parts and dotted DNS domains with at least two
//! labels. Quoted local parts and IP-literal domains are rejected.

use super::{ValidationError, ValidationResult};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .expect("valid email regex")
});

const MAX_EMAIL_CHARS: usize = 254;

pub fn validate_email(input: &str) -> ValidationResult {
    check_email(input).into()
}

pub fn check_email(input: &str) -> Result<(), ValidationError> {
    if input.len() <= MAX_EMAIL_CHARS && EMAIL_RE.is_match(input) {
        Ok(())
    } else {
        Err(ValidationError::Format)
    }
}
