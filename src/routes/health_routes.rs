use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::errors::AppError;

/// `GET /health`: estado del servicio y de cada fichero de datos
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let stores: serde_json::Map<String, Value> = state
        .data
        .health()
        .await?
        .into_iter()
        .map(|(name, health)| (name, json!(health)))
        .collect();

    Ok(Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "stores": stores,
    })))
}
