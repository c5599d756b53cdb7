//! Person repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the identity/contact part shared by every staff record.
//! - Own identity canonicalization and uniqueness checks.
//!
//! # Invariants
//! - National identity numbers are stored canonically (`1-9`, never `01-9`).
//! - Blank optional text is stored as `NULL`.
//! - At most one person holds a given national id or foreign id.

use crate::db::ensure_migrated;
use crate::model::person::{Person, PersonId};
use crate::model::rules::RecordValidationError;
use crate::repo::{parse_uuid, row_exists, Page, RecordRef, RepoError, RepoResult};
use crate::validation::identifiers::present_value;
use crate::validation::identity::canonical_identity_number;
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

pub(crate) const PERSON_COLUMNS: &str = "p.id AS id,
    p.first_name AS first_name,
    p.national_id AS national_id,
    p.foreign_id AS foreign_id,
    p.paternal_surname AS paternal_surname,
    p.maternal_surname AS maternal_surname,
    p.birth_date AS birth_date,
    p.address AS address,
    p.phone AS phone,
    p.email AS email";

const PERSON_ORDER_SQL: &str =
    " ORDER BY p.paternal_surname ASC, p.maternal_surname ASC, p.first_name ASC, p.id ASC";

/// Which staff table, if any, a person belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonKind {
    Teacher,
    Assistant,
    /// Neither teacher nor assistant.
    Other,
}

/// Query options for listing persons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonListQuery {
    pub kind: Option<PersonKind>,
    pub page: Page,
}

/// Repository interface for person records.
pub trait PersonRepository {
    fn create_person(&self, person: &Person) -> RepoResult<PersonId>;
    fn update_person(&self, person: &Person) -> RepoResult<()>;
    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>>;
    /// Looks up by national id in any valid spelling (`01-9` finds `1-9`).
    fn find_by_national_id(&self, national_id: &str) -> RepoResult<Option<Person>>;
    fn list_persons(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>>;
    fn person_kind(&self, id: PersonId) -> RepoResult<Option<PersonKind>>;
    /// Deletes the person and, by cascade, every record attached to them.
    fn delete_person(&self, id: PersonId) -> RepoResult<()>;
}

/// SQLite-backed person repository.
pub struct SqlitePersonRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersonRepository<'conn> {
    /// Creates a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl PersonRepository for SqlitePersonRepository<'_> {
    fn create_person(&self, person: &Person) -> RepoResult<PersonId> {
        let stored = storage_form(person)?;
        insert_person_row(self.conn, &stored)?;
        Ok(stored.id)
    }

    fn update_person(&self, person: &Person) -> RepoResult<()> {
        let stored = storage_form(person)?;
        update_person_row(self.conn, &stored)
    }

    fn get_person(&self, id: PersonId) -> RepoResult<Option<Person>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PERSON_COLUMNS} FROM persons p WHERE p.id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn find_by_national_id(&self, national_id: &str) -> RepoResult<Option<Person>> {
        let canonical = canonical_identity_number(national_id).map_err(|error| {
            RecordValidationError::InvalidField {
                field: "national_id",
                error,
            }
        })?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM persons p WHERE p.national_id = ?1;"
        ))?;
        let mut rows = stmt.query([canonical])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_person_row(row)?));
        }
        Ok(None)
    }

    fn list_persons(&self, query: &PersonListQuery) -> RepoResult<Vec<Person>> {
        let mut sql = format!("SELECT {PERSON_COLUMNS} FROM persons p WHERE 1 = 1");
        match query.kind {
            Some(PersonKind::Teacher) => {
                sql.push_str(" AND EXISTS (SELECT 1 FROM teachers t WHERE t.person_id = p.id)")
            }
            Some(PersonKind::Assistant) => {
                sql.push_str(" AND EXISTS (SELECT 1 FROM assistants a WHERE a.person_id = p.id)")
            }
            Some(PersonKind::Other) => sql.push_str(
                " AND NOT EXISTS (SELECT 1 FROM teachers t WHERE t.person_id = p.id)
                  AND NOT EXISTS (SELECT 1 FROM assistants a WHERE a.person_id = p.id)",
            ),
            None => {}
        }
        sql.push_str(PERSON_ORDER_SQL);

        let mut binds: Vec<Value> = Vec::new();
        query.page.apply(&mut sql, &mut binds);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut persons = Vec::new();
        while let Some(row) = rows.next()? {
            persons.push(parse_person_row(row)?);
        }
        Ok(persons)
    }

    fn person_kind(&self, id: PersonId) -> RepoResult<Option<PersonKind>> {
        let id_text = id.to_string();
        if !row_exists(self.conn, "SELECT 1 FROM persons WHERE id = ?1;", &[&id_text])? {
            return Ok(None);
        }
        if row_exists(
            self.conn,
            "SELECT 1 FROM teachers WHERE person_id = ?1;",
            &[&id_text],
        )? {
            return Ok(Some(PersonKind::Teacher));
        }
        if row_exists(
            self.conn,
            "SELECT 1 FROM assistants WHERE person_id = ?1;",
            &[&id_text],
        )? {
            return Ok(Some(PersonKind::Assistant));
        }
        Ok(Some(PersonKind::Other))
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM persons WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Person(id)));
        }
        info!("event=person_delete module=repo status=ok person_id={id}");
        Ok(())
    }
}

/// Validates and returns the exact shape written to storage.
pub(crate) fn storage_form(person: &Person) -> RepoResult<Person> {
    person.validate()?;

    let national_id = match present_value(person.national_id.as_deref()) {
        Some(value) => Some(canonical_identity_number(value).map_err(|error| {
            RecordValidationError::InvalidField {
                field: "national_id",
                error,
            }
        })?),
        None => None,
    };

    Ok(Person {
        id: person.id,
        first_name: person.first_name.trim().to_string(),
        national_id,
        foreign_id: owned_present(person.foreign_id.as_deref()),
        paternal_surname: person.paternal_surname.trim().to_string(),
        maternal_surname: person.maternal_surname.trim().to_string(),
        birth_date: person.birth_date,
        address: owned_present(person.address.as_deref()),
        phone: owned_present(person.phone.as_deref()),
        email: owned_present(person.email.as_deref()),
    })
}

/// Inserts a person already in storage form.
pub(crate) fn insert_person_row(conn: &Connection, person: &Person) -> RepoResult<()> {
    if row_exists(
        conn,
        "SELECT 1 FROM persons WHERE id = ?1;",
        &[&person.id.to_string()],
    )? {
        return Err(RepoError::AlreadyExists(RecordRef::Person(person.id)));
    }
    ensure_unique_identifiers(conn, person)?;

    conn.execute(
        "INSERT INTO persons (
            id,
            first_name,
            national_id,
            foreign_id,
            paternal_surname,
            maternal_surname,
            birth_date,
            address,
            phone,
            email
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        params![
            person.id.to_string(),
            person.first_name,
            person.national_id,
            person.foreign_id,
            person.paternal_surname,
            person.maternal_surname,
            person.birth_date,
            person.address,
            person.phone,
            person.email,
        ],
    )?;
    Ok(())
}

/// Updates a person already in storage form.
pub(crate) fn update_person_row(conn: &Connection, person: &Person) -> RepoResult<()> {
    ensure_unique_identifiers(conn, person)?;

    let changed = conn.execute(
        "UPDATE persons
         SET
            first_name = ?2,
            national_id = ?3,
            foreign_id = ?4,
            paternal_surname = ?5,
            maternal_surname = ?6,
            birth_date = ?7,
            address = ?8,
            phone = ?9,
            email = ?10,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1;",
        params![
            person.id.to_string(),
            person.first_name,
            person.national_id,
            person.foreign_id,
            person.paternal_surname,
            person.maternal_surname,
            person.birth_date,
            person.address,
            person.phone,
            person.email,
        ],
    )?;

    if changed == 0 {
        return Err(RepoError::NotFound(RecordRef::Person(person.id)));
    }
    Ok(())
}

pub(crate) fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let id_text: String = row.get("id")?;
    let person = Person {
        id: parse_uuid(&id_text, "persons.id")?,
        first_name: row.get("first_name")?,
        national_id: row.get("national_id")?,
        foreign_id: row.get("foreign_id")?,
        paternal_surname: row.get("paternal_surname")?,
        maternal_surname: row.get("maternal_surname")?,
        birth_date: row.get("birth_date")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
    };
    person.validate()?;
    Ok(person)
}

fn ensure_unique_identifiers(conn: &Connection, person: &Person) -> RepoResult<()> {
    let id_text = person.id.to_string();
    if let Some(national_id) = person.national_id.as_deref() {
        if row_exists(
            conn,
            "SELECT 1 FROM persons WHERE national_id = ?1 AND id <> ?2;",
            &[&national_id, &id_text],
        )? {
            return Err(RepoError::DuplicateNationalId(national_id.to_string()));
        }
    }
    if let Some(foreign_id) = person.foreign_id.as_deref() {
        if row_exists(
            conn,
            "SELECT 1 FROM persons WHERE foreign_id = ?1 AND id <> ?2;",
            &[&foreign_id, &id_text],
        )? {
            return Err(RepoError::DuplicateForeignId(foreign_id.to_string()));
        }
    }
    Ok(())
}

fn owned_present(value: Option<&str>) -> Option<String> {
    present_value(value).map(str::to_string)
}
