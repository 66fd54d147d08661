use std::sync::Arc;

use crate::dto::document_dto::{AttachmentUploadRequest, UploadDocumentRequest};
use crate::dto::ApiResponse;
use crate::models::entity::EntityKind;
use crate::models::{Attachment, Document};
use crate::services::DocumentService;
use crate::storage::DataStore;
use crate::utils::errors::AppError;

pub struct DocumentController {
    service: DocumentService,
}

impl DocumentController {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self {
            service: DocumentService::new(data),
        }
    }

    pub async fn upload(&self, request: UploadDocumentRequest) -> Result<ApiResponse<Document>, AppError> {
        let outcome = self.service.upload(request).await?;
        Ok(ApiResponse::success_with_message(
            outcome.value,
            "Documento subido correctamente".to_string(),
        )
        .with_warnings(outcome.warnings))
    }

    pub async fn attach(
        &self,
        kind: EntityKind,
        id: i64,
        request: AttachmentUploadRequest,
    ) -> Result<ApiResponse<Attachment>, AppError> {
        let outcome = self.service.attach(kind, id, request).await?;
        Ok(ApiResponse::success_with_message(
            outcome.value,
            "Documento adjuntado".to_string(),
        )
        .with_warnings(outcome.warnings))
    }
}
