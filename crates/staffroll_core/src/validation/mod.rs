//! Field-level validators shared by records and storage.
//!
//! # Responsibility
//! - Check single field values (identity number, phone, e-mail).
//! - Check the cross-field identifier rule for person-like records.
//!
//! # Invariants
//! - Every validator is a pure function of its input.
//! - Errors are flat and field-scoped; callers attach the field name.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod email;
pub mod identifiers;
pub mod identity;
pub mod phone;

/// Outcome of a boundary-level validator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    /// Input passed every check.
    Valid,
    /// Input does not match the lexical pattern.
    InvalidFormat,
    /// Input is well-formed but its check character is wrong.
    InvalidChecksum,
}

impl ValidationResult {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }

    /// Converts into the error taxonomy used by record validation.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::InvalidFormat => Err(ValidationError::Format),
            Self::InvalidChecksum => Err(ValidationError::Checksum),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(value: Result<(), ValidationError>) -> Self {
        match value {
            Ok(()) => Self::Valid,
            Err(ValidationError::Checksum) => Self::InvalidChecksum,
            Err(_) => Self::InvalidFormat,
        }
    }
}

/// Field-scoped validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Value does not match the expected lexical pattern.
    Format,
    /// Value is lexically valid but the check character does not match.
    Checksum,
    /// Neither a national identity number nor a foreign identifier was given.
    MissingIdentifier,
    /// Both a national identity number and a foreign identifier were given.
    ConflictingIdentifier,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format => write!(f, "value has an invalid format"),
            Self::Checksum => write!(f, "check digit does not match"),
            Self::MissingIdentifier => write!(
                f,
                "either a national identity number or a foreign identifier is required"
            ),
            Self::ConflictingIdentifier => write!(
                f,
                "only one of national identity number or foreign identifier may be set"
            ),
        }
    }
}

impl Error for ValidationError {}
