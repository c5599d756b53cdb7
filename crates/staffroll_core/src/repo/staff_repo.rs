//! Teacher/assistant repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist staff records as a person row plus one staff-table row.
//! - Keep both rows in sync inside one immediate transaction.
//!
//! # Invariants
//! - A staff write never leaves a person row without its staff row.
//! - Person-level rules are delegated to `person_repo` helpers.
//! - A teacher who manages an establishment keeps the classroom-teacher role.

use crate::db::ensure_migrated;
use crate::model::choices::{ContractType, Role, SubsidyType};
use crate::model::person::PersonId;
use crate::model::staff::{Assistant, SubsidyHours, Teacher};
use crate::repo::person_repo::{
    insert_person_row, parse_person_row, storage_form, update_person_row, PERSON_COLUMNS,
};
use crate::repo::{row_exists, to_u32, Page, RecordRef, RepoError, RepoResult};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const TEACHER_COLUMNS: &str = "t.role AS role,
    t.contract_type AS contract_type,
    t.subsidy AS subsidy,
    t.contract_hours AS contract_hours,
    t.hours_normal AS hours_normal,
    t.hours_sep AS hours_sep,
    t.hours_pie AS hours_pie";

const ASSISTANT_COLUMNS: &str = "a.position AS position,
    a.weekly_hours AS weekly_hours,
    a.hired_on AS hired_on,
    a.contract_type AS contract_type";

/// Query options for listing teachers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherListQuery {
    pub role: Option<Role>,
    pub subsidy: Option<SubsidyType>,
    pub page: Page,
}

/// Repository interface for teachers and assistants.
pub trait StaffRepository {
    fn create_teacher(&self, teacher: &Teacher) -> RepoResult<PersonId>;
    fn update_teacher(&self, teacher: &Teacher) -> RepoResult<()>;
    fn get_teacher(&self, id: PersonId) -> RepoResult<Option<Teacher>>;
    fn list_teachers(&self, query: &TeacherListQuery) -> RepoResult<Vec<Teacher>>;
    fn create_assistant(&self, assistant: &Assistant) -> RepoResult<PersonId>;
    fn update_assistant(&self, assistant: &Assistant) -> RepoResult<()>;
    fn get_assistant(&self, id: PersonId) -> RepoResult<Option<Assistant>>;
    fn list_assistants(&self, page: &Page) -> RepoResult<Vec<Assistant>>;
}

/// SQLite-backed staff repository.
pub struct SqliteStaffRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStaffRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl StaffRepository for SqliteStaffRepository<'_> {
    fn create_teacher(&self, teacher: &Teacher) -> RepoResult<PersonId> {
        teacher.validate()?;
        let person = storage_form(&teacher.person)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        insert_person_row(&tx, &person)?;
        tx.execute(
            "INSERT INTO teachers (
                person_id,
                role,
                contract_type,
                subsidy,
                contract_hours,
                hours_normal,
                hours_sep,
                hours_pie
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                person.id.to_string(),
                teacher.role.as_code(),
                teacher.contract_type.as_code(),
                teacher.subsidy.as_code(),
                teacher.contract_hours,
                teacher.subsidy_hours.normal,
                teacher.subsidy_hours.sep,
                teacher.subsidy_hours.pie,
            ],
        )?;
        tx.commit()?;

        info!(
            "event=teacher_create module=repo status=ok person_id={} role={}",
            person.id,
            teacher.role.as_code()
        );
        Ok(person.id)
    }

    fn update_teacher(&self, teacher: &Teacher) -> RepoResult<()> {
        teacher.validate()?;
        let person = storage_form(&teacher.person)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if teacher.role != Role::ClassroomTeacher
            && row_exists(
                &tx,
                "SELECT 1 FROM establishments WHERE manager_id = ?1 LIMIT 1;",
                &[&person.id.to_string()],
            )?
        {
            return Err(RepoError::ManagerNotClassroomTeacher(person.id));
        }
        let changed = tx.execute(
            "UPDATE teachers
             SET
                role = ?2,
                contract_type = ?3,
                subsidy = ?4,
                contract_hours = ?5,
                hours_normal = ?6,
                hours_sep = ?7,
                hours_pie = ?8
             WHERE person_id = ?1;",
            params![
                person.id.to_string(),
                teacher.role.as_code(),
                teacher.contract_type.as_code(),
                teacher.subsidy.as_code(),
                teacher.contract_hours,
                teacher.subsidy_hours.normal,
                teacher.subsidy_hours.sep,
                teacher.subsidy_hours.pie,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Teacher(person.id)));
        }
        update_person_row(&tx, &person)?;
        tx.commit()?;
        Ok(())
    }

    fn get_teacher(&self, id: PersonId) -> RepoResult<Option<Teacher>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS}, {TEACHER_COLUMNS}
             FROM persons p
             INNER JOIN teachers t ON t.person_id = p.id
             WHERE p.id = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_teacher_row(row)?));
        }
        Ok(None)
    }

    fn list_teachers(&self, query: &TeacherListQuery) -> RepoResult<Vec<Teacher>> {
        let mut sql = format!(
            "SELECT {PERSON_COLUMNS}, {TEACHER_COLUMNS}
             FROM persons p
             INNER JOIN teachers t ON t.person_id = p.id
             WHERE 1 = 1"
        );
        let mut binds: Vec<Value> = Vec::new();

        if let Some(role) = query.role {
            sql.push_str(" AND t.role = ?");
            binds.push(Value::Text(role.as_code().to_string()));
        }
        if let Some(subsidy) = query.subsidy {
            sql.push_str(" AND t.subsidy = ?");
            binds.push(Value::Text(subsidy.as_code().to_string()));
        }
        sql.push_str(" ORDER BY p.paternal_surname ASC, p.first_name ASC, p.id ASC");
        query.page.apply(&mut sql, &mut binds);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut teachers = Vec::new();
        while let Some(row) = rows.next()? {
            teachers.push(parse_teacher_row(row)?);
        }
        Ok(teachers)
    }

    fn create_assistant(&self, assistant: &Assistant) -> RepoResult<PersonId> {
        assistant.validate()?;
        let person = storage_form(&assistant.person)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        insert_person_row(&tx, &person)?;
        tx.execute(
            "INSERT INTO assistants (
                person_id,
                position,
                weekly_hours,
                hired_on,
                contract_type
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                person.id.to_string(),
                assistant.position.trim(),
                assistant.weekly_hours,
                assistant.hired_on,
                assistant.contract_type.as_code(),
            ],
        )?;
        tx.commit()?;

        info!(
            "event=assistant_create module=repo status=ok person_id={}",
            person.id
        );
        Ok(person.id)
    }

    fn update_assistant(&self, assistant: &Assistant) -> RepoResult<()> {
        assistant.validate()?;
        let person = storage_form(&assistant.person)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE assistants
             SET
                position = ?2,
                weekly_hours = ?3,
                hired_on = ?4,
                contract_type = ?5
             WHERE person_id = ?1;",
            params![
                person.id.to_string(),
                assistant.position.trim(),
                assistant.weekly_hours,
                assistant.hired_on,
                assistant.contract_type.as_code(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Assistant(person.id)));
        }
        update_person_row(&tx, &person)?;
        tx.commit()?;
        Ok(())
    }

    fn get_assistant(&self, id: PersonId) -> RepoResult<Option<Assistant>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS}, {ASSISTANT_COLUMNS}
             FROM persons p
             INNER JOIN assistants a ON a.person_id = p.id
             WHERE p.id = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_assistant_row(row)?));
        }
        Ok(None)
    }

    fn list_assistants(&self, page: &Page) -> RepoResult<Vec<Assistant>> {
        let mut sql = format!(
            "SELECT {PERSON_COLUMNS}, {ASSISTANT_COLUMNS}
             FROM persons p
             INNER JOIN assistants a ON a.person_id = p.id
             ORDER BY p.paternal_surname ASC, p.first_name ASC, p.id ASC"
        );
        let mut binds: Vec<Value> = Vec::new();
        page.apply(&mut sql, &mut binds);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut assistants = Vec::new();
        while let Some(row) = rows.next()? {
            assistants.push(parse_assistant_row(row)?);
        }
        Ok(assistants)
    }
}

fn parse_teacher_row(row: &Row<'_>) -> RepoResult<Teacher> {
    let role_text: String = row.get("role")?;
    let role = Role::from_code(&role_text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid role `{role_text}` in teachers.role")))?;
    let subsidy_text: String = row.get("subsidy")?;
    let subsidy = SubsidyType::from_code(&subsidy_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid subsidy `{subsidy_text}` in teachers.subsidy"))
    })?;

    Ok(Teacher {
        person: parse_person_row(row)?,
        role,
        contract_type: parse_contract_type(row, "teachers.contract_type")?,
        subsidy,
        contract_hours: to_u32(row.get("contract_hours")?, "teachers.contract_hours")?,
        subsidy_hours: SubsidyHours {
            normal: to_u32(row.get("hours_normal")?, "teachers.hours_normal")?,
            sep: to_u32(row.get("hours_sep")?, "teachers.hours_sep")?,
            pie: to_u32(row.get("hours_pie")?, "teachers.hours_pie")?,
        },
    })
}

fn parse_assistant_row(row: &Row<'_>) -> RepoResult<Assistant> {
    Ok(Assistant {
        person: parse_person_row(row)?,
        position: row.get("position")?,
        weekly_hours: to_u32(row.get("weekly_hours")?, "assistants.weekly_hours")?,
        hired_on: row.get("hired_on")?,
        contract_type: parse_contract_type(row, "assistants.contract_type")?,
    })
}

fn parse_contract_type(row: &Row<'_>, column: &'static str) -> RepoResult<ContractType> {
    let text: String = row.get("contract_type")?;
    ContractType::from_code(&text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid contract type `{text}` in {column}")))
}
