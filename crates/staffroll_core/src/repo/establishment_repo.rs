//! Establishment/course repository contracts and SQLite implementation.
//!
//! # Invariants
//! - An establishment manager is an existing classroom teacher.
//! - Courses reference an existing establishment and teacher.
//! - Check digits are stored uppercase.

use crate::db::ensure_migrated;
use crate::model::choices::Role;
use crate::model::establishment::{Course, CourseId, Establishment, Rbd};
use crate::model::person::PersonId;
use crate::repo::{
    ensure_establishment_exists, ensure_teacher_exists, parse_single_char, parse_uuid, row_exists,
    to_u32, Page, RecordRef, RepoError, RepoResult,
};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ESTABLISHMENT_SELECT_SQL: &str = "SELECT rbd, check_digit, name, manager_id FROM establishments";
const COURSE_SELECT_SQL: &str =
    "SELECT id, name, rbd, teacher_id, grade, letter, section FROM courses";

/// Repository interface for establishments and their courses.
pub trait EstablishmentRepository {
    fn create_establishment(&self, establishment: &Establishment) -> RepoResult<Rbd>;
    fn update_establishment(&self, establishment: &Establishment) -> RepoResult<()>;
    fn get_establishment(&self, rbd: Rbd) -> RepoResult<Option<Establishment>>;
    fn list_establishments(&self, page: &Page) -> RepoResult<Vec<Establishment>>;
    /// Deletes the establishment together with its courses and assignments.
    fn delete_establishment(&self, rbd: Rbd) -> RepoResult<()>;
    fn create_course(&self, course: &Course) -> RepoResult<CourseId>;
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    fn list_courses(&self, rbd: Rbd) -> RepoResult<Vec<Course>>;
    fn delete_course(&self, id: CourseId) -> RepoResult<()>;
}

/// SQLite-backed establishment repository.
pub struct SqliteEstablishmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEstablishmentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }

    fn ensure_manager_allowed(&self, manager_id: Option<PersonId>) -> RepoResult<()> {
        let Some(manager_id) = manager_id else {
            return Ok(());
        };
        let role_text: Option<String> = self
            .conn
            .query_row(
                "SELECT role FROM teachers WHERE person_id = ?1;",
                [manager_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match role_text.as_deref().map(Role::from_code) {
            None => Err(RepoError::MissingReference(RecordRef::Teacher(manager_id))),
            Some(Some(Role::ClassroomTeacher)) => Ok(()),
            Some(_) => Err(RepoError::ManagerNotClassroomTeacher(manager_id)),
        }
    }
}

impl EstablishmentRepository for SqliteEstablishmentRepository<'_> {
    fn create_establishment(&self, establishment: &Establishment) -> RepoResult<Rbd> {
        establishment.validate()?;
        if row_exists(
            self.conn,
            "SELECT 1 FROM establishments WHERE rbd = ?1;",
            &[&establishment.rbd],
        )? {
            return Err(RepoError::AlreadyExists(RecordRef::Establishment(
                establishment.rbd,
            )));
        }
        self.ensure_manager_allowed(establishment.manager_id)?;

        self.conn.execute(
            "INSERT INTO establishments (rbd, check_digit, name, manager_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                establishment.rbd,
                establishment.check_digit.to_ascii_uppercase().to_string(),
                establishment.name.trim(),
                establishment.manager_id.map(|id| id.to_string()),
            ],
        )?;

        info!(
            "event=establishment_create module=repo status=ok rbd={}",
            establishment.rbd
        );
        Ok(establishment.rbd)
    }

    fn update_establishment(&self, establishment: &Establishment) -> RepoResult<()> {
        establishment.validate()?;
        self.ensure_manager_allowed(establishment.manager_id)?;

        let changed = self.conn.execute(
            "UPDATE establishments
             SET check_digit = ?2, name = ?3, manager_id = ?4
             WHERE rbd = ?1;",
            params![
                establishment.rbd,
                establishment.check_digit.to_ascii_uppercase().to_string(),
                establishment.name.trim(),
                establishment.manager_id.map(|id| id.to_string()),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Establishment(
                establishment.rbd,
            )));
        }
        Ok(())
    }

    fn get_establishment(&self, rbd: Rbd) -> RepoResult<Option<Establishment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ESTABLISHMENT_SELECT_SQL} WHERE rbd = ?1;"))?;
        let mut rows = stmt.query([rbd])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_establishment_row(row)?));
        }
        Ok(None)
    }

    fn list_establishments(&self, page: &Page) -> RepoResult<Vec<Establishment>> {
        let mut sql = format!("{ESTABLISHMENT_SELECT_SQL} ORDER BY rbd ASC");
        let mut binds: Vec<Value> = Vec::new();
        page.apply(&mut sql, &mut binds);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut establishments = Vec::new();
        while let Some(row) = rows.next()? {
            establishments.push(parse_establishment_row(row)?);
        }
        Ok(establishments)
    }

    fn delete_establishment(&self, rbd: Rbd) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM establishments WHERE rbd = ?1;", [rbd])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Establishment(rbd)));
        }
        info!("event=establishment_delete module=repo status=ok rbd={rbd}");
        Ok(())
    }

    fn create_course(&self, course: &Course) -> RepoResult<CourseId> {
        course.validate()?;
        ensure_establishment_exists(self.conn, course.rbd)?;
        ensure_teacher_exists(self.conn, course.teacher_id)?;

        self.conn.execute(
            "INSERT INTO courses (id, name, rbd, teacher_id, grade, letter, section)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                course.id.to_string(),
                course.name.trim(),
                course.rbd,
                course.teacher_id.to_string(),
                course.grade.trim(),
                course.letter.to_string(),
                course.section.trim(),
            ],
        )?;
        Ok(course.id)
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_course_row(row)?));
        }
        Ok(None)
    }

    fn list_courses(&self, rbd: Rbd) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COURSE_SELECT_SQL} WHERE rbd = ?1 ORDER BY grade ASC, letter ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([rbd])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }
        Ok(courses)
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM courses WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Course(id)));
        }
        Ok(())
    }
}

fn parse_establishment_row(row: &Row<'_>) -> RepoResult<Establishment> {
    let check_digit_text: String = row.get("check_digit")?;
    let manager_id = match row.get::<_, Option<String>>("manager_id")? {
        Some(text) => Some(parse_uuid(&text, "establishments.manager_id")?),
        None => None,
    };
    let establishment = Establishment {
        rbd: to_u32(row.get("rbd")?, "establishments.rbd")?,
        check_digit: parse_single_char(&check_digit_text, "establishments.check_digit")?,
        name: row.get("name")?,
        manager_id,
    };
    establishment.validate()?;
    Ok(establishment)
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let id_text: String = row.get("id")?;
    let teacher_text: String = row.get("teacher_id")?;
    let letter_text: String = row.get("letter")?;
    let course = Course {
        id: parse_uuid(&id_text, "courses.id")?,
        name: row.get("name")?,
        rbd: to_u32(row.get("rbd")?, "courses.rbd")?,
        teacher_id: parse_uuid(&teacher_text, "courses.teacher_id")?,
        grade: row.get("grade")?,
        letter: parse_single_char(&letter_text, "courses.letter")?,
        section: row.get("section")?,
    };
    course.validate()?;
    Ok(course)
}
