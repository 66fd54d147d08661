//! Envoltorio común de las respuestas de la API

use serde::{Deserialize, Serialize};

use crate::repositories::Outcome;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    /// Avisos no fatales (p.ej. un store corrupto leído como vacío)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            warnings: Vec::new(),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::success(data)
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

impl<T> From<Outcome<T>> for ApiResponse<T> {
    fn from(outcome: Outcome<T>) -> Self {
        ApiResponse::success(outcome.value).with_warnings(outcome.warnings)
    }
}
