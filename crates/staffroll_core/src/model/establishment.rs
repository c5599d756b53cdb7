//! Establishment and course records.

use crate::model::person::PersonId;
use crate::model::rules::{require_text, RecordValidationError};
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Official establishment role number, used as the primary key.
pub type Rbd = u32;
pub type CourseId = Uuid;

pub const ESTABLISHMENT_NAME_MAX_CHARS: usize = 100;
pub const COURSE_NAME_MAX_CHARS: usize = 100;
pub const GRADE_MAX_CHARS: usize = 50;
pub const SECTION_MAX_CHARS: usize = 100;

/// School establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    pub rbd: Rbd,
    /// Check character of the RBD (`0-9` or `K`).
    pub check_digit: char,
    pub name: String,
    /// Teacher in charge; must be a classroom teacher.
    pub manager_id: Option<PersonId>,
}

impl Establishment {
    pub fn new(rbd: Rbd, check_digit: char, name: impl Into<String>) -> Self {
        Self {
            rbd,
            check_digit,
            name: name.into(),
            manager_id: None,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if !(self.check_digit.is_ascii_digit() || self.check_digit.eq_ignore_ascii_case(&'k')) {
            return Err(RecordValidationError::InvalidField {
                field: "check_digit",
                error: ValidationError::Format,
            });
        }
        require_text("name", &self.name, ESTABLISHMENT_NAME_MAX_CHARS)
    }
}

/// Class group taught at an establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub rbd: Rbd,
    pub teacher_id: PersonId,
    pub grade: String,
    pub letter: char,
    pub section: String,
}

impl Course {
    pub fn new(
        name: impl Into<String>,
        rbd: Rbd,
        teacher_id: PersonId,
        grade: impl Into<String>,
        letter: char,
        section: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rbd,
            teacher_id,
            grade: grade.into(),
            letter,
            section: section.into(),
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("name", &self.name, COURSE_NAME_MAX_CHARS)?;
        require_text("grade", &self.grade, GRADE_MAX_CHARS)?;
        if self.letter.is_whitespace() || self.letter.is_control() {
            return Err(RecordValidationError::EmptyField("letter"));
        }
        require_text("section", &self.section, SECTION_MAX_CHARS)
    }
}
