//! Documentación: subida al repositorio central y adjuntos de vehículos / servicios

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, warn};
use validator::Validate;

use crate::dto::document_dto::{AttachmentUploadRequest, UploadDocumentRequest};
use crate::models::document::category_target;
use crate::models::entity::{record_id, EntityKind};
use crate::models::{Attachment, Document};
use crate::repositories::entity_repository::find_raw_mut;
use crate::repositories::{EntityRepository, Outcome};
use crate::storage::{DataStore, DocumentStorage, RemovalReport};
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct DocumentService {
    data: Arc<DataStore>,
    storage: DocumentStorage,
}

impl DocumentService {
    pub fn new(data: Arc<DataStore>) -> Self {
        let storage = DocumentStorage::new(data.config().clone());
        Self { data, storage }
    }

    /// Guarda el fichero en `documents/<categoria>/<asignacion|general>/` y
    /// crea el registro en `documentacion.json`
    pub async fn upload(&self, request: UploadDocumentRequest) -> AppResult<Outcome<Document>> {
        request.validate()?;
        let bytes = decode_content(&request.contenido_base64)?;

        if let (Some(kind), Some(id)) = (category_target(&request.categoria), request.asignacion) {
            self.ensure_exists(kind, id).await?;
        }

        let folder = self
            .storage
            .category_folder(&request.categoria, request.asignacion);
        let ruta = self
            .storage
            .save(&folder, &request.nombre_archivo, &bytes)
            .await?;

        let document = Document {
            id: 0,
            categoria: request.categoria,
            descripcion: request.descripcion,
            archivo: Some(ruta.clone()),
            asignacion: request.asignacion,
            fecha_subida: Some(Utc::now().naive_utc()),
            extra: Map::new(),
        };
        let created = EntityRepository::<Document>::new(self.data.clone())
            .create(document)
            .await;

        if created.is_err() {
            warn!("⚠️ Alta de documento fallida, se borra {}", ruta);
            let mut report = RemovalReport::default();
            if let Err(e) = self.storage.remove_file(&ruta, &mut report).await {
                warn!("⚠️ No se pudo borrar {}: {}", ruta, e);
            }
        }
        created
    }

    /// Guarda el fichero en la carpeta propia de la entidad y lo añade a `documentos`
    pub async fn attach(
        &self,
        kind: EntityKind,
        id: i64,
        request: AttachmentUploadRequest,
    ) -> AppResult<Outcome<Attachment>> {
        request.validate()?;
        if !matches!(kind, EntityKind::Vehiculo | EntityKind::Servicio) {
            return Err(bad_request_error(&format!(
                "Los {} no admiten adjuntos",
                kind.collection()
            )));
        }
        let bytes = decode_content(&request.contenido_base64)?;
        let folder = self
            .data
            .config()
            .entity_folder(kind, id)
            .ok_or_else(|| bad_request_error("Tipo de entidad sin carpeta de documentos"))?;

        let mut guard = self.data.store(kind).lock().await;
        let mut loaded = guard.load().await?;
        let record = find_raw_mut(&mut loaded.records, id)
            .ok_or_else(|| not_found_error(kind.as_str(), &id.to_string()))?;

        let ruta = self
            .storage
            .save(&folder, &request.nombre_archivo, &bytes)
            .await?;
        let attachment = Attachment {
            nombre: request.nombre_archivo,
            ruta,
        };

        let fields = record
            .as_object_mut()
            .ok_or_else(|| bad_request_error("El registro no es un objeto JSON"))?;
        let documentos = fields
            .entry("documentos")
            .or_insert_with(|| Value::Array(Vec::new()));
        if !documentos.is_array() {
            *documentos = Value::Array(Vec::new());
        }
        if let Value::Array(list) = documentos {
            list.push(serde_json::to_value(&attachment)?);
        }
        guard.save(&loaded.records).await?;

        info!("📎 Adjunto {} añadido a {} {}", attachment.ruta, kind, id);
        let mut outcome = Outcome::new(attachment);
        outcome.warnings.extend(loaded.warning);
        Ok(outcome)
    }

    async fn ensure_exists(&self, kind: EntityKind, id: i64) -> AppResult<()> {
        let loaded = self.data.store(kind).read().await?;
        if loaded.records.iter().any(|r| record_id(r) == Some(id)) {
            Ok(())
        } else {
            Err(bad_request_error(&format!("No existe {} con id {}", kind, id)))
        }
    }
}

fn decode_content(encoded: &str) -> AppResult<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|_| bad_request_error("El contenido no es base64 válido"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocumentService) {
        let dir = TempDir::new().unwrap();
        let data = Arc::new(DataStore::new(StorageConfig::new(dir.path())));
        (dir, DocumentService::new(data))
    }

    #[tokio::test]
    async fn test_upload_creates_record_and_file() {
        let (dir, service) = setup();
        let request = UploadDocumentRequest {
            categoria: "Otros".to_string(),
            descripcion: "Parte de horas".to_string(),
            asignacion: None,
            nombre_archivo: "parte.pdf".to_string(),
            contenido_base64: STANDARD.encode(b"%PDF"),
        };

        let document = service.upload(request).await.unwrap().value;
        assert_eq!(document.id, 1);
        assert_eq!(
            document.archivo.as_deref(),
            Some("data/documents/Otros/general/parte.pdf")
        );
        assert_eq!(
            std::fs::read(dir.path().join("data/documents/Otros/general/parte.pdf")).unwrap(),
            b"%PDF"
        );
    }

    #[tokio::test]
    async fn test_upload_removes_file_when_record_cannot_be_stored() {
        let (dir, service) = setup();
        // Un directorio en lugar del store hace fallar la lectura
        std::fs::create_dir_all(dir.path().join("data/documentacion.json")).unwrap();
        let request = UploadDocumentRequest {
            categoria: "Otros".to_string(),
            descripcion: String::new(),
            asignacion: None,
            nombre_archivo: "parte.pdf".to_string(),
            contenido_base64: STANDARD.encode(b"%PDF"),
        };

        assert!(service.upload(request).await.is_err());
        assert!(!dir.path().join("data/documents/Otros/general/parte.pdf").exists());
        assert!(!dir.path().join("data/documents/Otros/general").exists());
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_assignee() {
        let (_dir, service) = setup();
        let request = UploadDocumentRequest {
            categoria: "PRL".to_string(),
            descripcion: String::new(),
            asignacion: Some(4),
            nombre_archivo: "curso.pdf".to_string(),
            contenido_base64: STANDARD.encode(b"x"),
        };
        assert!(service.upload(request).await.is_err());
    }

    #[tokio::test]
    async fn test_attach_to_vehicle_appends_document() {
        let (dir, service) = setup();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(
            data_dir.join("vehiculos.json"),
            json!([{"id": 7, "marca": "Yamaha", "matricula": "1234BCD"}]).to_string(),
        )
        .unwrap();

        let request = AttachmentUploadRequest {
            nombre_archivo: "itv.pdf".to_string(),
            contenido_base64: STANDARD.encode(b"itv"),
        };
        let attachment = service
            .attach(EntityKind::Vehiculo, 7, request)
            .await
            .unwrap()
            .value;
        assert_eq!(attachment.ruta, "data/documents/vehicles/veh_7/itv.pdf");

        let stored: Value =
            serde_json::from_str(&std::fs::read_to_string(data_dir.join("vehiculos.json")).unwrap())
                .unwrap();
        assert_eq!(stored[0]["documentos"][0]["nombre"], "itv.pdf");
    }

    #[tokio::test]
    async fn test_attach_rejects_invalid_base64() {
        let (_dir, service) = setup();
        let request = AttachmentUploadRequest {
            nombre_archivo: "itv.pdf".to_string(),
            contenido_base64: "%%%".to_string(),
        };
        assert!(service.attach(EntityKind::Vehiculo, 7, request).await.is_err());
    }
}
