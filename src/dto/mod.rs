//! DTOs de la API HTTP

pub mod api_response;
pub mod dashboard_dto;
pub mod document_dto;
pub mod trash_dto;

pub use api_response::ApiResponse;
