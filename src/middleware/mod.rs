//! Middleware del sistema: autenticación y CORS

pub mod auth;
pub mod cors;

pub use cors::cors_layer;
