//! Assignment/biennium repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist teacher and assistant assignments to establishments.
//! - Persist biennium accrual periods.
//!
//! # Invariants
//! - Rows reference an existing staff member of the right kind and, for
//!   assignments, an existing establishment.
//! - Lists are ordered by `start_date ASC, id ASC`.

use crate::db::ensure_migrated;
use crate::model::assignment::{
    AssignmentId, AssistantAssignment, Biennium, BienniumId, TeacherAssignment,
};
use crate::model::establishment::Rbd;
use crate::model::person::PersonId;
use crate::model::staff::SubsidyHours;
use crate::repo::{
    ensure_establishment_exists, ensure_teacher_exists, parse_uuid, row_exists, to_u32,
    RecordRef, RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const TEACHER_ASSIGNMENT_SELECT_SQL: &str = "SELECT
    id,
    teacher_id,
    rbd,
    hours_normal,
    hours_sep,
    hours_pie,
    contract_hours,
    start_date,
    end_date
FROM teacher_assignments";

const ASSISTANT_ASSIGNMENT_SELECT_SQL: &str =
    "SELECT id, assistant_id, rbd, start_date, end_date FROM assistant_assignments";

const BIENNIUM_SELECT_SQL: &str =
    "SELECT id, teacher_id, start_date, end_date, accrued_hours FROM bienniums";

/// Repository interface for time-bound staff records.
pub trait AssignmentRepository {
    fn create_teacher_assignment(&self, assignment: &TeacherAssignment)
        -> RepoResult<AssignmentId>;
    fn list_teacher_assignments(&self, teacher_id: PersonId) -> RepoResult<Vec<TeacherAssignment>>;
    fn list_establishment_assignments(&self, rbd: Rbd) -> RepoResult<Vec<TeacherAssignment>>;
    fn delete_teacher_assignment(&self, id: AssignmentId) -> RepoResult<()>;
    fn create_assistant_assignment(
        &self,
        assignment: &AssistantAssignment,
    ) -> RepoResult<AssignmentId>;
    fn list_assistant_assignments(
        &self,
        assistant_id: PersonId,
    ) -> RepoResult<Vec<AssistantAssignment>>;
    fn delete_assistant_assignment(&self, id: AssignmentId) -> RepoResult<()>;
    fn create_biennium(&self, biennium: &Biennium) -> RepoResult<BienniumId>;
    fn list_bienniums(&self, teacher_id: PersonId) -> RepoResult<Vec<Biennium>>;
    fn delete_biennium(&self, id: BienniumId) -> RepoResult<()>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }

    fn query_teacher_assignments(
        &self,
        filter_sql: &str,
        key: &dyn rusqlite::ToSql,
    ) -> RepoResult<Vec<TeacherAssignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEACHER_ASSIGNMENT_SELECT_SQL} WHERE {filter_sql} ORDER BY start_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([key])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_teacher_assignment_row(row)?);
        }
        Ok(assignments)
    }

    fn delete_by_id(&self, table: &'static str, target: RecordRef, id: uuid::Uuid) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(target));
        }
        Ok(())
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn create_teacher_assignment(
        &self,
        assignment: &TeacherAssignment,
    ) -> RepoResult<AssignmentId> {
        assignment.validate()?;
        ensure_teacher_exists(self.conn, assignment.teacher_id)?;
        ensure_establishment_exists(self.conn, assignment.rbd)?;

        self.conn.execute(
            "INSERT INTO teacher_assignments (
                id,
                teacher_id,
                rbd,
                hours_normal,
                hours_sep,
                hours_pie,
                contract_hours,
                start_date,
                end_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                assignment.id.to_string(),
                assignment.teacher_id.to_string(),
                assignment.rbd,
                assignment.subsidy_hours.normal,
                assignment.subsidy_hours.sep,
                assignment.subsidy_hours.pie,
                assignment.contract_hours,
                assignment.start,
                assignment.end,
            ],
        )?;
        Ok(assignment.id)
    }

    fn list_teacher_assignments(&self, teacher_id: PersonId) -> RepoResult<Vec<TeacherAssignment>> {
        self.query_teacher_assignments("teacher_id = ?1", &teacher_id.to_string())
    }

    fn list_establishment_assignments(&self, rbd: Rbd) -> RepoResult<Vec<TeacherAssignment>> {
        self.query_teacher_assignments("rbd = ?1", &rbd)
    }

    fn delete_teacher_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        self.delete_by_id("teacher_assignments", RecordRef::TeacherAssignment(id), id)
    }

    fn create_assistant_assignment(
        &self,
        assignment: &AssistantAssignment,
    ) -> RepoResult<AssignmentId> {
        assignment.validate()?;
        if !row_exists(
            self.conn,
            "SELECT 1 FROM assistants WHERE person_id = ?1;",
            &[&assignment.assistant_id.to_string()],
        )? {
            return Err(RepoError::MissingReference(RecordRef::Assistant(
                assignment.assistant_id,
            )));
        }
        ensure_establishment_exists(self.conn, assignment.rbd)?;

        self.conn.execute(
            "INSERT INTO assistant_assignments (id, assistant_id, rbd, start_date, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                assignment.id.to_string(),
                assignment.assistant_id.to_string(),
                assignment.rbd,
                assignment.start,
                assignment.end,
            ],
        )?;
        Ok(assignment.id)
    }

    fn list_assistant_assignments(
        &self,
        assistant_id: PersonId,
    ) -> RepoResult<Vec<AssistantAssignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSISTANT_ASSIGNMENT_SELECT_SQL} WHERE assistant_id = ?1 ORDER BY start_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([assistant_id.to_string()])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assistant_assignment_row(row)?);
        }
        Ok(assignments)
    }

    fn delete_assistant_assignment(&self, id: AssignmentId) -> RepoResult<()> {
        self.delete_by_id(
            "assistant_assignments",
            RecordRef::AssistantAssignment(id),
            id,
        )
    }

    fn create_biennium(&self, biennium: &Biennium) -> RepoResult<BienniumId> {
        biennium.validate()?;
        ensure_teacher_exists(self.conn, biennium.teacher_id)?;

        self.conn.execute(
            "INSERT INTO bienniums (id, teacher_id, start_date, end_date, accrued_hours)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                biennium.id.to_string(),
                biennium.teacher_id.to_string(),
                biennium.start,
                biennium.end,
                biennium.accrued_hours,
            ],
        )?;
        Ok(biennium.id)
    }

    fn list_bienniums(&self, teacher_id: PersonId) -> RepoResult<Vec<Biennium>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BIENNIUM_SELECT_SQL} WHERE teacher_id = ?1 ORDER BY start_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([teacher_id.to_string()])?;
        let mut bienniums = Vec::new();
        while let Some(row) = rows.next()? {
            bienniums.push(parse_biennium_row(row)?);
        }
        Ok(bienniums)
    }

    fn delete_biennium(&self, id: BienniumId) -> RepoResult<()> {
        self.delete_by_id("bienniums", RecordRef::Biennium(id), id)
    }
}

fn parse_teacher_assignment_row(row: &Row<'_>) -> RepoResult<TeacherAssignment> {
    let id_text: String = row.get("id")?;
    let teacher_text: String = row.get("teacher_id")?;
    let assignment = TeacherAssignment {
        id: parse_uuid(&id_text, "teacher_assignments.id")?,
        teacher_id: parse_uuid(&teacher_text, "teacher_assignments.teacher_id")?,
        rbd: to_u32(row.get("rbd")?, "teacher_assignments.rbd")?,
        subsidy_hours: SubsidyHours {
            normal: to_u32(row.get("hours_normal")?, "teacher_assignments.hours_normal")?,
            sep: to_u32(row.get("hours_sep")?, "teacher_assignments.hours_sep")?,
            pie: to_u32(row.get("hours_pie")?, "teacher_assignments.hours_pie")?,
        },
        contract_hours: to_u32(
            row.get("contract_hours")?,
            "teacher_assignments.contract_hours",
        )?,
        start: row.get("start_date")?,
        end: row.get("end_date")?,
    };
    assignment.validate()?;
    Ok(assignment)
}

fn parse_assistant_assignment_row(row: &Row<'_>) -> RepoResult<AssistantAssignment> {
    let id_text: String = row.get("id")?;
    let assistant_text: String = row.get("assistant_id")?;
    let assignment = AssistantAssignment {
        id: parse_uuid(&id_text, "assistant_assignments.id")?,
        assistant_id: parse_uuid(&assistant_text, "assistant_assignments.assistant_id")?,
        rbd: to_u32(row.get("rbd")?, "assistant_assignments.rbd")?,
        start: row.get("start_date")?,
        end: row.get("end_date")?,
    };
    assignment.validate()?;
    Ok(assignment)
}

fn parse_biennium_row(row: &Row<'_>) -> RepoResult<Biennium> {
    let id_text: String = row.get("id")?;
    let teacher_text: String = row.get("teacher_id")?;
    let biennium = Biennium {
        id: parse_uuid(&id_text, "bienniums.id")?,
        teacher_id: parse_uuid(&teacher_text, "bienniums.teacher_id")?,
        start: row.get("start_date")?,
        end: row.get("end_date")?,
        accrued_hours: to_u32(row.get("accrued_hours")?, "bienniums.accrued_hours")?,
    };
    biennium.validate()?;
    Ok(biennium)
}
