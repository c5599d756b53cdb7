//! Person domain model.
//!
//! # Responsibility
//! - Define the identity/contact record shared by teachers and assistants.
//! - Validate identifiers, phone and e-mail before persistence.
//!
//! # Invariants
//! - Exactly one of `national_id` / `foreign_id` is present.
//! - `national_id` passes the modulo-11 check digit when present.
//! - `phone` is a nine-digit mobile number when present.

use crate::model::rules::{
    check_field, check_stored_date, limit_optional_text, require_text, RecordValidationError,
    RuleResult,
};
use crate::validation::email::check_email;
use crate::validation::identifiers::{check_identifier_exclusivity, present_value};
use crate::validation::identity::check_identity_number;
use crate::validation::phone::check_phone;
use crate::validation::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for persons and the staff records layered on them.
pub type PersonId = Uuid;

pub const NAME_MAX_CHARS: usize = 100;
pub const NATIONAL_ID_MAX_CHARS: usize = 12;
pub const FOREIGN_ID_MAX_CHARS: usize = 50;
pub const ADDRESS_MAX_CHARS: usize = 255;
pub const PHONE_MAX_CHARS: usize = 20;
pub const EMAIL_MAX_CHARS: usize = 254;

/// Identity and contact data of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    /// National identity number in `digits-check` form.
    pub national_id: Option<String>,
    /// Identifier for people without a national identity number.
    pub foreign_id: Option<String>,
    pub paternal_surname: String,
    pub maternal_surname: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Person {
    /// Creates a person with a generated ID and no optional data.
    ///
    /// The result is not valid until one identifier is set.
    pub fn new(
        first_name: impl Into<String>,
        paternal_surname: impl Into<String>,
        maternal_surname: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            national_id: None,
            foreign_id: None,
            paternal_surname: paternal_surname.into(),
            maternal_surname: maternal_surname.into(),
            birth_date: None,
            address: None,
            phone: None,
            email: None,
        }
    }

    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }

    pub fn with_foreign_id(mut self, foreign_id: impl Into<String>) -> Self {
        self.foreign_id = Some(foreign_id.into());
        self
    }

    /// `first paternal maternal`, skipping blank parts.
    pub fn full_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.paternal_surname.as_str(),
            self.maternal_surname.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Checks every field-level and cross-field rule.
    ///
    /// Blank optional fields are treated as absent.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("first_name", &self.first_name, NAME_MAX_CHARS)?;
        require_text("paternal_surname", &self.paternal_surname, NAME_MAX_CHARS)?;
        require_text("maternal_surname", &self.maternal_surname, NAME_MAX_CHARS)?;
        limit_optional_text(
            "national_id",
            self.national_id.as_deref(),
            NATIONAL_ID_MAX_CHARS,
        )?;
        limit_optional_text(
            "foreign_id",
            self.foreign_id.as_deref(),
            FOREIGN_ID_MAX_CHARS,
        )?;
        limit_optional_text("address", self.address.as_deref(), ADDRESS_MAX_CHARS)?;
        limit_optional_text("phone", self.phone.as_deref(), PHONE_MAX_CHARS)?;
        limit_optional_text("email", self.email.as_deref(), EMAIL_MAX_CHARS)?;

        check_field(
            "identifier",
            check_identifier_exclusivity(self.national_id.as_deref(), self.foreign_id.as_deref()),
        )?;

        check_present("national_id", self.national_id.as_deref(), check_identity_number)?;
        check_present("phone", self.phone.as_deref(), check_phone)?;
        check_present("email", self.email.as_deref(), check_email)?;
        if let Some(birth_date) = self.birth_date {
            check_stored_date("birth_date", birth_date)?;
        }
        Ok(())
    }
}

fn check_present(
    field: &'static str,
    value: Option<&str>,
    check: fn(&str) -> Result<(), ValidationError>,
) -> RuleResult {
    match value {
        // Validators see the raw value; surrounding whitespace is a format error.
        Some(raw) if present_value(Some(raw)).is_some() => check_field(field, check(raw)),
        _ => Ok(()),
    }
}
