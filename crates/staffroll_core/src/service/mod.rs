//! Use-case services over repository contracts.
//!
//! # Responsibility
//! - Orchestrate repository calls into record-management use cases.
//! - Keep callers independent of storage details.
//!
//! # Invariants
//! - Services never bypass repository validation.

use crate::model::person::PersonId;
use crate::repo::{RecordRef, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment_service;
pub mod document_service;
pub mod staff_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for staff use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Requested record does not exist.
    NotFound(RecordRef),
    /// Persistence-layer failure, including validation rejections.
    Repo(RepoError),
    /// Write succeeded but read-back disagreed.
    InconsistentState(&'static str),
}

impl ServiceError {
    pub(crate) fn teacher_not_found(id: PersonId) -> Self {
        Self::NotFound(RecordRef::Teacher(id))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(target) => Self::NotFound(target),
            other => Self::Repo(other),
        }
    }
}

/// Short stable code for log lines; never carries record content.
pub(crate) fn error_code(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::NotFound(_) => "not_found",
        ServiceError::InconsistentState(_) => "inconsistent_state",
        ServiceError::Repo(repo) => match repo {
            RepoError::Validation(_) => "validation_failed",
            RepoError::Db(_) => "db_error",
            RepoError::NotFound(_) => "not_found",
            RepoError::AlreadyExists(_) => "already_exists",
            RepoError::DuplicateNationalId(_) => "duplicate_national_id",
            RepoError::DuplicateForeignId(_) => "duplicate_foreign_id",
            RepoError::MissingReference(_) => "missing_reference",
            RepoError::ManagerNotClassroomTeacher(_) => "manager_not_classroom_teacher",
            RepoError::InvalidData(_) => "invalid_data",
        },
    }
}
