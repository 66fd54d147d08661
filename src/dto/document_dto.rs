//! DTOs de subida de documentos (contenido en base64)

use serde::Deserialize;
use validator::Validate;

/// `POST /api/documentacion/subir`
#[derive(Debug, Deserialize, Validate)]
pub struct UploadDocumentRequest {
    #[validate(length(min = 1, message = "La categoría es obligatoria"))]
    pub categoria: String,

    #[serde(default)]
    pub descripcion: String,

    #[serde(default)]
    pub asignacion: Option<i64>,

    #[validate(length(min = 1, message = "El nombre del fichero es obligatorio"))]
    pub nombre_archivo: String,

    #[validate(length(min = 1, message = "El fichero está vacío"))]
    pub contenido_base64: String,
}

/// `POST /api/vehiculos/:id/documentos`, `POST /api/servicios/:id/documentos`
#[derive(Debug, Deserialize, Validate)]
pub struct AttachmentUploadRequest {
    #[validate(length(min = 1, message = "El nombre del fichero es obligatorio"))]
    pub nombre_archivo: String,

    #[validate(length(min = 1, message = "El fichero está vacío"))]
    pub contenido_base64: String,
}
