//! Document metadata attached to a person.
//!
//! Only the stored path is tracked; file contents live outside the core.

use crate::model::choices::DocumentState;
use crate::model::person::PersonId;
use crate::model::rules::{require_text, RecordValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DocumentId = Uuid;

pub const TITLE_MAX_CHARS: usize = 255;
pub const FILE_PATH_MAX_CHARS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub person_id: PersonId,
    pub title: String,
    /// Location under the document storage root, e.g. `documentos/cv.pdf`.
    pub file_path: String,
    pub state: DocumentState,
    /// Epoch milliseconds. Assigned by storage on insert.
    pub uploaded_at: Option<i64>,
}

impl Document {
    pub fn new(
        person_id: PersonId,
        title: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            person_id,
            title: title.into(),
            file_path: file_path.into(),
            state: DocumentState::Yes,
            uploaded_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        require_text("title", &self.title, TITLE_MAX_CHARS)?;
        require_text("file_path", &self.file_path, FILE_PATH_MAX_CHARS)
    }
}
