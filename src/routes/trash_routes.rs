use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::trash_controller::TrashController;
use crate::dto::trash_dto::{EmptyTrashQuery, TrashEntryResponse, TrashListQuery};
use crate::dto::ApiResponse;
use crate::models::session::SessionContext;
use crate::repositories::trash_repository::{EmptyResult, PurgeResult, RestoreResult};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trash_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trash).delete(empty_trash))
        .route("/:trash_id", get(get_trash_entry).delete(purge_trash_entry))
        .route("/:trash_id/restaurar", post(restore_trash_entry))
}

async fn list_trash(
    State(state): State<AppState>,
    _session: SessionContext,
    Query(query): Query<TrashListQuery>,
) -> Result<Json<ApiResponse<Vec<TrashEntryResponse>>>, AppError> {
    let controller = TrashController::new(state.data.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn get_trash_entry(
    State(state): State<AppState>,
    _session: SessionContext,
    Path(trash_id): Path<Uuid>,
) -> Result<Json<ApiResponse<TrashEntryResponse>>, AppError> {
    let controller = TrashController::new(state.data.clone());
    let response = controller.get_by_id(trash_id).await?;
    Ok(Json(response))
}

async fn restore_trash_entry(
    State(state): State<AppState>,
    session: SessionContext,
    Path(trash_id): Path<Uuid>,
) -> Result<Json<ApiResponse<RestoreResult>>, AppError> {
    let controller = TrashController::new(state.data.clone());
    let response = controller.restore(&session, trash_id).await?;
    Ok(Json(response))
}

async fn purge_trash_entry(
    State(state): State<AppState>,
    session: SessionContext,
    Path(trash_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PurgeResult>>, AppError> {
    let controller = TrashController::new(state.data.clone());
    let response = controller.purge(&session, trash_id).await?;
    Ok(Json(response))
}

async fn empty_trash(
    State(state): State<AppState>,
    session: SessionContext,
    Query(query): Query<EmptyTrashQuery>,
) -> Result<Json<ApiResponse<EmptyResult>>, AppError> {
    let controller = TrashController::new(state.data.clone());
    let response = controller.empty(&session, query).await?;
    Ok(Json(response))
}
