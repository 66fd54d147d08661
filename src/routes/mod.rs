//! Registro explícito de rutas
//!
//! Cada tipo de entidad se monta con `entity_router::<T>()`.

pub mod dashboard_routes;
pub mod document_routes;
pub mod entity_routes;
pub mod health_routes;
pub mod trash_routes;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::models::{Absence, Document, Employee, Maintenance, PpeDelivery, Service, Vehicle};
use crate::state::AppState;

use entity_routes::entity_router;

/// Rutas bajo `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/empleados", entity_router::<Employee>())
        .nest(
            "/vehiculos",
            entity_router::<Vehicle>().merge(document_routes::vehicle_attachment_router()),
        )
        .nest(
            "/servicios",
            entity_router::<Service>().merge(document_routes::service_attachment_router()),
        )
        .nest("/ausencias", entity_router::<Absence>())
        .nest("/epis", entity_router::<PpeDelivery>())
        .nest("/mantenimiento", entity_router::<Maintenance>())
        .nest(
            "/documentacion",
            entity_router::<Document>().merge(document_routes::create_upload_router()),
        )
        .nest("/papelera", trash_routes::create_trash_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
}

/// Aplicación completa con CORS y trazas HTTP
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/health", get(health_routes::health_check))
        .nest("/api", api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
