//! Teacher and assistant records layered on [`Person`].

use crate::model::choices::{ContractType, Role, SubsidyType};
use crate::model::person::{Person, PersonId};
use crate::model::rules::{check_stored_date, require_text, RecordValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const POSITION_MAX_CHARS: usize = 100;

/// Weekly hours split by funding source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyHours {
    pub normal: u32,
    pub sep: u32,
    pub pie: u32,
}

impl SubsidyHours {
    pub fn new(normal: u32, sep: u32, pie: u32) -> Self {
        Self { normal, sep, pie }
    }

    pub fn get(&self, subsidy: SubsidyType) -> u32 {
        match subsidy {
            SubsidyType::Normal => self.normal,
            SubsidyType::Sep => self.sep,
            SubsidyType::Pie => self.pie,
        }
    }

    /// Sum of all three subsidies, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.normal.saturating_add(self.sep).saturating_add(self.pie)
    }

    /// Component-wise sum, saturating at `u32::MAX`.
    pub fn saturating_add(self, other: Self) -> Self {
        Self {
            normal: self.normal.saturating_add(other.normal),
            sep: self.sep.saturating_add(other.sep),
            pie: self.pie.saturating_add(other.pie),
        }
    }
}

/// Teaching staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub person: Person,
    pub role: Role,
    pub contract_type: ContractType,
    /// Primary funding source.
    pub subsidy: SubsidyType,
    /// Weekly hours under the contract.
    pub contract_hours: u32,
    pub subsidy_hours: SubsidyHours,
}

impl Teacher {
    pub fn new(person: Person, role: Role, contract_type: ContractType, subsidy: SubsidyType) -> Self {
        Self {
            person,
            role,
            contract_type,
            subsidy,
            contract_hours: 0,
            subsidy_hours: SubsidyHours::default(),
        }
    }

    pub fn id(&self) -> PersonId {
        self.person.id
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        self.person.validate()
    }
}

/// Non-teaching staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    pub person: Person,
    pub position: String,
    pub weekly_hours: u32,
    pub hired_on: NaiveDate,
    pub contract_type: ContractType,
}

impl Assistant {
    pub fn new(
        person: Person,
        position: impl Into<String>,
        weekly_hours: u32,
        hired_on: NaiveDate,
        contract_type: ContractType,
    ) -> Self {
        Self {
            person,
            position: position.into(),
            weekly_hours,
            hired_on,
            contract_type,
        }
    }

    pub fn id(&self) -> PersonId {
        self.person.id
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        self.person.validate()?;
        require_text("position", &self.position, POSITION_MAX_CHARS)?;
        check_stored_date("hired_on", self.hired_on)
    }
}
