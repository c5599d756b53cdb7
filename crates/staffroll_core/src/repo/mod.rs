//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Provide CRUD APIs per aggregate over the migrated schema.
//! - Keep SQL details out of services and callers.
//!
//! # Invariants
//! - Write paths call the record's `validate()` before any SQL mutation.
//! - Identity fields are canonicalized and checked for uniqueness before
//!   insert/update; the schema constraints back this up.
//! - References (staff, establishments) are checked up front and reported
//!   as `MissingReference` instead of a raw foreign-key failure.
//! - Read paths reject undecodable persisted rows with `InvalidData`.

use crate::db::DbError;
use crate::model::assignment::{AssignmentId, BienniumId};
use crate::model::document::DocumentId;
use crate::model::establishment::{CourseId, Rbd};
use crate::model::person::PersonId;
use crate::model::rules::RecordValidationError;
use rusqlite::{Connection, OptionalExtension, ToSql};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod assignment_repo;
pub mod document_repo;
pub mod establishment_repo;
pub mod person_repo;
pub mod staff_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Typed pointer to one stored record, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Person(PersonId),
    Teacher(PersonId),
    Assistant(PersonId),
    Establishment(Rbd),
    Course(CourseId),
    TeacherAssignment(AssignmentId),
    AssistantAssignment(AssignmentId),
    Biennium(BienniumId),
    Document(DocumentId),
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person(id) => write!(f, "person {id}"),
            Self::Teacher(id) => write!(f, "teacher {id}"),
            Self::Assistant(id) => write!(f, "assistant {id}"),
            Self::Establishment(rbd) => write!(f, "establishment {rbd}"),
            Self::Course(id) => write!(f, "course {id}"),
            Self::TeacherAssignment(id) => write!(f, "teacher assignment {id}"),
            Self::AssistantAssignment(id) => write!(f, "assistant assignment {id}"),
            Self::Biennium(id) => write!(f, "biennium {id}"),
            Self::Document(id) => write!(f, "document {id}"),
        }
    }
}

/// Error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed `validate()`.
    Validation(RecordValidationError),
    Db(DbError),
    /// Target record of an update/delete does not exist.
    NotFound(RecordRef),
    /// Insert collides with an existing primary key.
    AlreadyExists(RecordRef),
    /// Another person already holds this national identity number.
    DuplicateNationalId(String),
    /// Another person already holds this foreign identifier.
    DuplicateForeignId(String),
    /// A referenced record does not exist.
    MissingReference(RecordRef),
    /// Establishment manager is not a classroom teacher.
    ManagerNotClassroomTeacher(PersonId),
    /// Persisted row cannot be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::AlreadyExists(target) => write!(f, "{target} already exists"),
            Self::DuplicateNationalId(value) => {
                write!(f, "national identity number `{value}` is already registered")
            }
            Self::DuplicateForeignId(value) => {
                write!(f, "foreign identifier `{value}` is already registered")
            }
            Self::MissingReference(target) => write!(f, "referenced {target} does not exist"),
            Self::ManagerNotClassroomTeacher(id) => {
                write!(f, "manager {id} must be a classroom teacher")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Paging options shared by list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Page {
    /// Appends `LIMIT/OFFSET` placeholders and their values.
    pub(crate) fn apply(&self, sql: &mut String, binds: &mut Vec<rusqlite::types::Value>) {
        use rusqlite::types::Value;
        match (self.limit, self.offset) {
            (Some(limit), 0) => {
                sql.push_str(" LIMIT ?");
                binds.push(Value::Integer(i64::from(limit)));
            }
            (Some(limit), offset) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                binds.push(Value::Integer(i64::from(limit)));
                binds.push(Value::Integer(i64::from(offset)));
            }
            (None, 0) => {}
            (None, offset) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                binds.push(Value::Integer(i64::from(offset)));
            }
        }
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn to_u32(value: i64, column: &'static str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("value {value} out of range in {column}")))
}

pub(crate) fn parse_single_char(value: &str, column: &'static str) -> RepoResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(RepoError::InvalidData(format!(
            "expected one character, got `{value}` in {column}"
        ))),
    }
}

/// Runs an `EXISTS`-style probe and reports whether a row matched.
pub(crate) fn row_exists(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> RepoResult<bool> {
    let found = conn
        .query_row(sql, params, |_| Ok(()))
        .optional()?
        .is_some();
    Ok(found)
}

pub(crate) fn ensure_teacher_exists(conn: &Connection, id: PersonId) -> RepoResult<()> {
    if !row_exists(
        conn,
        "SELECT 1 FROM teachers WHERE person_id = ?1;",
        &[&id.to_string()],
    )? {
        return Err(RepoError::MissingReference(RecordRef::Teacher(id)));
    }
    Ok(())
}

pub(crate) fn ensure_establishment_exists(conn: &Connection, rbd: Rbd) -> RepoResult<()> {
    if !row_exists(
        conn,
        "SELECT 1 FROM establishments WHERE rbd = ?1;",
        &[&rbd],
    )? {
        return Err(RepoError::MissingReference(RecordRef::Establishment(rbd)));
    }
    Ok(())
}
