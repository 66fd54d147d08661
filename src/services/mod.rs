//! Servicios de aplicación que combinan varios stores

pub mod dashboard_service;
pub mod document_service;

pub use dashboard_service::DashboardService;
pub use document_service::DocumentService;
