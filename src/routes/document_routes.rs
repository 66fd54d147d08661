use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};

use crate::controllers::document_controller::DocumentController;
use crate::dto::document_dto::{AttachmentUploadRequest, UploadDocumentRequest};
use crate::dto::ApiResponse;
use crate::models::entity::EntityKind;
use crate::models::session::SessionContext;
use crate::models::{Attachment, Document};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `POST /subir` bajo `/api/documentacion`
pub fn create_upload_router() -> Router<AppState> {
    Router::new().route("/subir", post(upload_document))
}

/// `POST /:id/documentos` bajo `/api/vehiculos`
pub fn vehicle_attachment_router() -> Router<AppState> {
    Router::new().route("/:id/documentos", post(attach_to_vehicle))
}

/// `POST /:id/documentos` bajo `/api/servicios`
pub fn service_attachment_router() -> Router<AppState> {
    Router::new().route("/:id/documentos", post(attach_to_service))
}

async fn upload_document(
    State(state): State<AppState>,
    _session: SessionContext,
    Json(request): Json<UploadDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let controller = DocumentController::new(state.data.clone());
    let response = controller.upload(request).await?;
    Ok(Json(response))
}

async fn attach_to_vehicle(
    State(state): State<AppState>,
    _session: SessionContext,
    Path(id): Path<i64>,
    Json(request): Json<AttachmentUploadRequest>,
) -> Result<Json<ApiResponse<Attachment>>, AppError> {
    let controller = DocumentController::new(state.data.clone());
    let response = controller.attach(EntityKind::Vehiculo, id, request).await?;
    Ok(Json(response))
}

async fn attach_to_service(
    State(state): State<AppState>,
    _session: SessionContext,
    Path(id): Path<i64>,
    Json(request): Json<AttachmentUploadRequest>,
) -> Result<Json<ApiResponse<Attachment>>, AppError> {
    let controller = DocumentController::new(state.data.clone());
    let response = controller.attach(EntityKind::Servicio, id, request).await?;
    Ok(Json(response))
}
