//! Document metadata use cases.

use crate::model::choices::DocumentState;
use crate::model::document::{Document, DocumentId};
use crate::model::person::PersonId;
use crate::repo::document_repo::DocumentRepository;
use crate::service::ServiceResult;
use log::info;

pub struct DocumentService<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records that a file was stored for `person_id`.
    pub fn attach(
        &self,
        person_id: PersonId,
        title: impl Into<String>,
        file_path: impl Into<String>,
    ) -> ServiceResult<Document> {
        let document = self
            .repo
            .attach_document(&Document::new(person_id, title, file_path))?;
        info!(
            "event=document_attach module=service status=ok person_id={person_id} document_id={}",
            document.id
        );
        Ok(document)
    }

    pub fn list(&self, person_id: PersonId) -> ServiceResult<Vec<Document>> {
        Ok(self.repo.list_documents(person_id)?)
    }

    pub fn mark(&self, id: DocumentId, state: DocumentState) -> ServiceResult<()> {
        Ok(self.repo.set_document_state(id, state)?)
    }

    pub fn remove(&self, id: DocumentId) -> ServiceResult<()> {
        Ok(self.repo.delete_document(id)?)
    }
}
