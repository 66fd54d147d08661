use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardResponse;
use crate::dto::ApiResponse;
use crate::models::session::SessionContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

async fn dashboard(
    State(state): State<AppState>,
    _session: SessionContext,
) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    let controller = DashboardController::new(state.data.clone());
    let response = controller.summary().await?;
    Ok(Json(response))
}
