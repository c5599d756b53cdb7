//! Shared record-level checks and their error type.

use crate::validation::ValidationError;
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record validation failure, scoped to one field or field pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Required text field is blank.
    EmptyField(&'static str),
    /// Text field exceeds its character limit.
    FieldTooLong { field: &'static str, max: usize },
    /// Field value failed a validator.
    InvalidField {
        field: &'static str,
        error: ValidationError,
    },
    /// Period ends before it starts.
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// Date year falls outside `0..=9999`.
    DateOutOfRange { field: &'static str, date: NaiveDate },
}

impl RecordValidationError {
    /// Returns the field-scoped validator error, when there is one.
    pub fn validation_error(&self) -> Option<ValidationError> {
        match self {
            Self::InvalidField { error, .. } => Some(*error),
            _ => None,
        }
    }
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "`{field}` must be at most {max} characters")
            }
            Self::InvalidField { field, error } => write!(f, "`{field}` is invalid: {error}"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "end date {end} is earlier than start date {start}")
            }
            Self::DateOutOfRange { field, date } => {
                write!(f, "`{field}` date {date} is outside years 0000..9999")
            }
        }
    }
}

impl Error for RecordValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidField { error, .. } => Some(error),
            _ => None,
        }
    }
}

pub(crate) type RuleResult = Result<(), RecordValidationError>;

pub(crate) fn require_text(field: &'static str, value: &str, max: usize) -> RuleResult {
    if value.trim().is_empty() {
        return Err(RecordValidationError::EmptyField(field));
    }
    limit_text(field, value, max)
}

pub(crate) fn limit_text(field: &'static str, value: &str, max: usize) -> RuleResult {
    if value.chars().count() > max {
        return Err(RecordValidationError::FieldTooLong { field, max });
    }
    Ok(())
}

pub(crate) fn limit_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> RuleResult {
    match value {
        Some(value) => limit_text(field, value, max),
        None => Ok(()),
    }
}

pub(crate) fn check_field(
    field: &'static str,
    result: Result<(), ValidationError>,
) -> RuleResult {
    result.map_err(|error| RecordValidationError::InvalidField { field, error })
}

/// Dates are stored as `YYYY-MM-DD` text and compared as strings, which only
/// orders correctly for four-digit, non-negative years.
pub(crate) fn check_stored_date(field: &'static str, date: NaiveDate) -> RuleResult {
    if !(0..=9999).contains(&date.year()) {
        return Err(RecordValidationError::DateOutOfRange { field, date });
    }
    Ok(())
}

pub(crate) fn check_date_range(start: NaiveDate, end: NaiveDate) -> RuleResult {
    check_stored_date("start_date", start)?;
    check_stored_date("end_date", end)?;
    if end < start {
        return Err(RecordValidationError::InvalidDateRange { start, end });
    }
    Ok(())
}
