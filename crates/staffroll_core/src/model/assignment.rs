//! Time-bound staff records: establishment assignments and bienniums.
//!
//! # Invariants
//! - `end` is never earlier than `start`.
//! - Referenced staff and establishments must exist when persisted; this is
//!   checked by the repository, not here.

use crate::model::establishment::Rbd;
use crate::model::person::PersonId;
use crate::model::rules::{check_date_range, RecordValidationError};
use crate::model::staff::SubsidyHours;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AssignmentId = Uuid;
pub type BienniumId = Uuid;

/// Hours a teacher works at one establishment over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub id: AssignmentId,
    pub teacher_id: PersonId,
    pub rbd: Rbd,
    pub subsidy_hours: SubsidyHours,
    pub contract_hours: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TeacherAssignment {
    pub fn new(teacher_id: PersonId, rbd: Rbd, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            teacher_id,
            rbd,
            subsidy_hours: SubsidyHours::default(),
            contract_hours: 0,
            start,
            end,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        check_date_range(self.start, self.end)
    }

    /// Whether the assignment covers `day` (both ends inclusive).
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Period an assistant works at one establishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantAssignment {
    pub id: AssignmentId,
    pub assistant_id: PersonId,
    pub rbd: Rbd,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AssistantAssignment {
    pub fn new(assistant_id: PersonId, rbd: Rbd, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            assistant_id,
            rbd,
            start,
            end,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        check_date_range(self.start, self.end)
    }
}

/// Two-year seniority period and the hours it accrued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biennium {
    pub id: BienniumId,
    pub teacher_id: PersonId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub accrued_hours: u32,
}

impl Biennium {
    pub fn new(teacher_id: PersonId, start: NaiveDate, end: NaiveDate, accrued_hours: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            teacher_id,
            start,
            end,
            accrued_hours,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        check_date_range(self.start, self.end)
    }
}
