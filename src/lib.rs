//! PRODE Última Milla Manager
//!
//! Backend HTTP para la gestión de plantilla y flota de una operadora de
//! última milla. Cada tipo de entidad se guarda en su propio fichero JSON y
//! los registros borrados pasan por una papelera común.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
