//! Core domain logic for Staffroll, a school-staff record keeper.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::assignment::{AssistantAssignment, Biennium, TeacherAssignment};
pub use model::choices::{ContractType, DocumentState, Role, SubsidyType};
pub use model::document::Document;
pub use model::establishment::{Course, Establishment, Rbd};
pub use model::person::{Person, PersonId};
pub use model::rules::RecordValidationError;
pub use model::staff::{Assistant, SubsidyHours, Teacher};
pub use repo::assignment_repo::{AssignmentRepository, SqliteAssignmentRepository};
pub use repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
pub use repo::establishment_repo::{EstablishmentRepository, SqliteEstablishmentRepository};
pub use repo::person_repo::{PersonKind, PersonListQuery, PersonRepository, SqlitePersonRepository};
pub use repo::staff_repo::{SqliteStaffRepository, StaffRepository, TeacherListQuery};
pub use repo::{Page, RecordRef, RepoError, RepoResult};
pub use service::assignment_service::{AssignmentService, HourSummary, TeacherAssignmentRequest};
pub use service::document_service::DocumentService;
pub use service::staff_service::StaffService;
pub use service::{ServiceError, ServiceResult};
pub use validation::email::validate_email;
pub use validation::identifiers::check_identifier_exclusivity;
pub use validation::identity::{canonical_identity_number, validate_identity_number};
pub use validation::phone::validate_phone;
pub use validation::{ValidationError, ValidationResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
