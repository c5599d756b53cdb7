//! Staff registration use cases.
//!
//! # Responsibility
//! - Register and update persons, teachers and assistants.
//! - Return the stored (canonical) shape of every written record.
//!
//! # Invariants
//! - Log events carry record IDs and error codes only, never personal data.

use crate::model::person::{Person, PersonId};
use crate::model::staff::{Assistant, Teacher};
use crate::repo::person_repo::{PersonListQuery, PersonRepository};
use crate::repo::staff_repo::{StaffRepository, TeacherListQuery};
use crate::repo::{Page, RecordRef};
use crate::service::{error_code, ServiceError, ServiceResult};
use log::{info, warn};

/// Facade over person and staff repositories.
pub struct StaffService<P: PersonRepository, S: StaffRepository> {
    persons: P,
    staff: S,
}

impl<P: PersonRepository, S: StaffRepository> StaffService<P, S> {
    pub fn new(persons: P, staff: S) -> Self {
        Self { persons, staff }
    }

    /// Registers a person who is neither teacher nor assistant.
    pub fn register_person(&self, person: &Person) -> ServiceResult<Person> {
        let result = self
            .persons
            .create_person(person)
            .map_err(ServiceError::from)
            .and_then(|id| self.read_back_person(id));
        log_outcome("person_register", person.id, &result);
        result
    }

    pub fn update_person(&self, person: &Person) -> ServiceResult<Person> {
        self.persons.update_person(person)?;
        self.read_back_person(person.id)
    }

    pub fn get_person(&self, id: PersonId) -> ServiceResult<Person> {
        self.persons
            .get_person(id)?
            .ok_or(ServiceError::NotFound(RecordRef::Person(id)))
    }

    /// Looks up a person by national id in any valid spelling.
    pub fn find_by_national_id(&self, national_id: &str) -> ServiceResult<Option<Person>> {
        Ok(self.persons.find_by_national_id(national_id)?)
    }

    pub fn list_persons(&self, query: &PersonListQuery) -> ServiceResult<Vec<Person>> {
        Ok(self.persons.list_persons(query)?)
    }

    /// Removes a person and everything attached to them.
    pub fn remove_person(&self, id: PersonId) -> ServiceResult<()> {
        let result = self.persons.delete_person(id).map_err(ServiceError::from);
        log_outcome("person_remove", id, &result);
        result
    }

    pub fn register_teacher(&self, teacher: &Teacher) -> ServiceResult<Teacher> {
        let result = self
            .staff
            .create_teacher(teacher)
            .map_err(ServiceError::from)
            .and_then(|id| self.get_teacher(id))
            .map_err(|err| match err {
                ServiceError::NotFound(_) => {
                    ServiceError::InconsistentState("registered teacher not found in read-back")
                }
                other => other,
            });
        log_outcome("teacher_register", teacher.id(), &result);
        result
    }

    pub fn update_teacher(&self, teacher: &Teacher) -> ServiceResult<Teacher> {
        self.staff.update_teacher(teacher)?;
        self.get_teacher(teacher.id())
    }

    pub fn get_teacher(&self, id: PersonId) -> ServiceResult<Teacher> {
        self.staff
            .get_teacher(id)?
            .ok_or_else(|| ServiceError::teacher_not_found(id))
    }

    pub fn list_teachers(&self, query: &TeacherListQuery) -> ServiceResult<Vec<Teacher>> {
        Ok(self.staff.list_teachers(query)?)
    }

    pub fn register_assistant(&self, assistant: &Assistant) -> ServiceResult<Assistant> {
        let result = self
            .staff
            .create_assistant(assistant)
            .map_err(ServiceError::from)
            .and_then(|id| {
                self.staff.get_assistant(id)?.ok_or(ServiceError::InconsistentState(
                    "registered assistant not found in read-back",
                ))
            });
        log_outcome("assistant_register", assistant.id(), &result);
        result
    }

    pub fn update_assistant(&self, assistant: &Assistant) -> ServiceResult<Assistant> {
        self.staff.update_assistant(assistant)?;
        self.get_assistant(assistant.id())
    }

    pub fn get_assistant(&self, id: PersonId) -> ServiceResult<Assistant> {
        self.staff
            .get_assistant(id)?
            .ok_or(ServiceError::NotFound(RecordRef::Assistant(id)))
    }

    pub fn list_assistants(&self, page: &Page) -> ServiceResult<Vec<Assistant>> {
        Ok(self.staff.list_assistants(page)?)
    }

    fn read_back_person(&self, id: PersonId) -> ServiceResult<Person> {
        self.persons
            .get_person(id)?
            .ok_or(ServiceError::InconsistentState("person not found in read-back"))
    }
}

fn log_outcome<T>(event: &'static str, id: PersonId, result: &ServiceResult<T>) {
    match result {
        Ok(_) => info!("event={event} module=service status=ok person_id={id}"),
        Err(err) => warn!(
            "event={event} module=service status=error person_id={id} error_code={}",
            error_code(err)
        ),
    }
}
