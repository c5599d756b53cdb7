//! Document metadata repository.

use crate::db::ensure_migrated;
use crate::model::choices::DocumentState;
use crate::model::document::{Document, DocumentId};
use crate::model::person::PersonId;
use crate::repo::{parse_uuid, row_exists, RecordRef, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const DOCUMENT_SELECT_SQL: &str =
    "SELECT id, person_id, title, file_path, state, uploaded_at FROM documents";

/// Repository interface for document metadata.
pub trait DocumentRepository {
    /// Stores a document and returns it with `uploaded_at` filled in.
    fn attach_document(&self, document: &Document) -> RepoResult<Document>;
    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>>;
    /// Newest first.
    fn list_documents(&self, person_id: PersonId) -> RepoResult<Vec<Document>>;
    fn set_document_state(&self, id: DocumentId, state: DocumentState) -> RepoResult<()>;
    fn delete_document(&self, id: DocumentId) -> RepoResult<()>;
}

pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn attach_document(&self, document: &Document) -> RepoResult<Document> {
        document.validate()?;
        if !row_exists(
            self.conn,
            "SELECT 1 FROM persons WHERE id = ?1;",
            &[&document.person_id.to_string()],
        )? {
            return Err(RepoError::MissingReference(RecordRef::Person(
                document.person_id,
            )));
        }

        self.conn.execute(
            "INSERT INTO documents (id, person_id, title, file_path, state)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                document.id.to_string(),
                document.person_id.to_string(),
                document.title.trim(),
                document.file_path.trim(),
                document.state.as_code(),
            ],
        )?;

        self.get_document(document.id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("document {} missing after insert", document.id))
        })
    }

    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_document_row(row)?));
        }
        Ok(None)
    }

    fn list_documents(&self, person_id: PersonId) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DOCUMENT_SELECT_SQL} WHERE person_id = ?1 ORDER BY uploaded_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([person_id.to_string()])?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }

    fn set_document_state(&self, id: DocumentId, state: DocumentState) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE documents SET state = ?2 WHERE id = ?1;",
            params![id.to_string(), state.as_code()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Document(id)));
        }
        Ok(())
    }

    fn delete_document(&self, id: DocumentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Document(id)));
        }
        Ok(())
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id_text: String = row.get("id")?;
    let person_text: String = row.get("person_id")?;
    let state_text: String = row.get("state")?;
    let state = DocumentState::from_code(&state_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid state `{state_text}` in documents.state"))
    })?;

    let document = Document {
        id: parse_uuid(&id_text, "documents.id")?,
        person_id: parse_uuid(&person_text, "documents.person_id")?,
        title: row.get("title")?,
        file_path: row.get("file_path")?,
        state,
        uploaded_at: Some(row.get("uploaded_at")?),
    };
    document.validate()?;
    Ok(document)
}
