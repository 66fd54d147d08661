use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::entity_controller::EntityController;
use crate::dto::trash_dto::TrashEntryResponse;
use crate::dto::ApiResponse;
use crate::models::entity::Entity;
use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router CRUD de un tipo de entidad (`/` y `/:id`)
pub fn entity_router<T: Entity>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entities::<T>).post(create_entity::<T>))
        .route(
            "/:id",
            get(get_entity::<T>)
                .put(update_entity::<T>)
                .delete(delete_entity::<T>),
        )
}

async fn list_entities<T: Entity>(
    State(state): State<AppState>,
    _session: SessionContext,
) -> Result<Json<ApiResponse<Vec<T>>>, AppError> {
    let controller = EntityController::<T>::new(state.data.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_entity<T: Entity>(
    State(state): State<AppState>,
    _session: SessionContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let controller = EntityController::<T>::new(state.data.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_entity<T: Entity>(
    State(state): State<AppState>,
    _session: SessionContext,
    Json(item): Json<T>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let controller = EntityController::<T>::new(state.data.clone());
    let response = controller.create(item).await?;
    Ok(Json(response))
}

async fn update_entity<T: Entity>(
    State(state): State<AppState>,
    _session: SessionContext,
    Path(id): Path<i64>,
    Json(item): Json<T>,
) -> Result<Json<ApiResponse<T>>, AppError> {
    let controller = EntityController::<T>::new(state.data.clone());
    let response = controller.update(id, item).await?;
    Ok(Json(response))
}

async fn delete_entity<T: Entity>(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<TrashEntryResponse>>, AppError> {
    let controller = EntityController::<T>::new(state.data.clone());
    let response = controller.delete(&session, id).await?;
    Ok(Json(response))
}
