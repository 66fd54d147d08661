//! Autenticación JWT
//!
//! Cada petición protegida construye su `SessionContext` a partir de la
//! cabecera `Authorization: Bearer <token>`.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::{
    models::session::SessionContext,
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

        let token = extract_token_from_header(auth_header)?;
        let claims = verify_token(token, &state.jwt)?;

        debug!("🔑 Sesión de {} ({:?})", claims.sub, claims.role);
        Ok(SessionContext::new(claims.sub, claims.role))
    }
}
