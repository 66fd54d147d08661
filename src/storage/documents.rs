//! Ficheros adjuntos bajo `data/documents/`
//!
//! Guardado de adjuntos y borrado de los ficheros que pertenecen a un
//! registro cuando se purga de la papelera.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::models::entity::EntityKind;
use crate::utils::errors::{bad_request_error, AppResult};

/// Resultado del borrado de ficheros de un registro
#[derive(Debug, Default, Clone)]
pub struct RemovalReport {
    /// Rutas relativas efectivamente borradas
    pub removed: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentStorage {
    config: StorageConfig,
}

impl DocumentStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Guarda `bytes` en `folder` y devuelve la ruta relativa a la carpeta base.
    /// Si el nombre ya existe se añade `_<YYYYmmddHHMMSS>` antes de la extensión.
    pub async fn save(&self, folder: &Path, file_name: &str, bytes: &[u8]) -> AppResult<String> {
        let file_name = sanitize_file_name(file_name);
        if file_name.is_empty() {
            return Err(bad_request_error("El nombre del fichero no es válido"));
        }

        fs::create_dir_all(folder).await?;
        let mut target = folder.join(&file_name);
        if fs::try_exists(&target).await? {
            target = folder.join(timestamped(&file_name));
        }

        fs::write(&target, bytes).await?;
        let relative = self.config.relative_to_base(&target);
        info!("📎 Documento guardado en {}", relative);
        Ok(relative)
    }

    /// Carpeta para un documento del repositorio central
    pub fn category_folder(&self, categoria: &str, asignacion: Option<i64>) -> PathBuf {
        let owner = asignacion
            .map(|id| id.to_string())
            .unwrap_or_else(|| "general".to_string());
        self.config
            .documents_dir()
            .join(sanitize_file_name(categoria))
            .join(owner)
    }

    /// Borra un fichero referenciado por un registro y su carpeta si queda vacía
    pub async fn remove_file(&self, relative: &str, report: &mut RemovalReport) -> AppResult<()> {
        let Some(path) = self.config.resolve(relative) else {
            warn!("⚠️ Ruta rechazada al purgar: {}", relative);
            report
                .warnings
                .push(format!("Ruta no permitida, no se borra: {}", relative));
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("🗑️ Fichero borrado: {}", path.display());
                report.removed.push(relative.to_string());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Fichero ya inexistente: {}", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(parent) = path.parent() {
            self.remove_dir_if_empty(parent).await?;
        }
        Ok(())
    }

    /// Borra recursivamente la carpeta propia de una entidad
    pub async fn remove_folder(&self, folder: &Path, report: &mut RemovalReport) -> AppResult<()> {
        match fs::remove_dir_all(folder).await {
            Ok(()) => {
                debug!("🗑️ Carpeta borrada: {}", folder.display());
                report.removed.push(self.config.relative_to_base(folder));
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_dir_if_empty(&self, dir: &Path) -> AppResult<()> {
        let documents = self.config.documents_dir();
        if !dir.starts_with(&documents) || dir == documents {
            return Ok(());
        }

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if entries.next_entry().await?.is_none() {
            fs::remove_dir(dir).await?;
            debug!("🗑️ Carpeta vacía borrada: {}", dir.display());
        }
        Ok(())
    }
}

/// Espacios → `_`, sin separadores de ruta ni `..`
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

fn timestamped(file_name: &str) -> String {
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, stamp, ext),
        _ => format!("{}_{}", file_name, stamp),
    }
}

/// Rutas de ficheros que un registro referencia, según su tipo
pub fn owned_file_refs(kind: EntityKind, record: &Value) -> Vec<String> {
    let text = |value: Option<&Value>| {
        value
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    match kind {
        EntityKind::Empleado => text(record.get("foto")).into_iter().collect(),
        EntityKind::Vehiculo | EntityKind::Servicio => record
            .get("documentos")
            .and_then(Value::as_array)
            .map(|docs| docs.iter().filter_map(|d| text(d.get("ruta"))).collect())
            .unwrap_or_default(),
        EntityKind::Ausencia => text(record.get("justificante")).into_iter().collect(),
        EntityKind::Epi => text(record.get("documento").and_then(|d| d.get("ruta")))
            .into_iter()
            .collect(),
        EntityKind::Mantenimiento | EntityKind::Documento => {
            text(record.get("archivo")).into_iter().collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("ficha técnica.pdf"), "ficha_técnica.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_file_name("  "), "");
    }

    #[test]
    fn test_owned_file_refs_per_kind() {
        let veh = json!({"id": 7, "documentos": [
            {"nombre": "itv.pdf", "ruta": "data/documents/vehicles/veh_7/itv.pdf"},
            {"nombre": "vacío", "ruta": ""}
        ]});
        assert_eq!(
            owned_file_refs(EntityKind::Vehiculo, &veh),
            vec!["data/documents/vehicles/veh_7/itv.pdf"]
        );

        let epi = json!({"documento": {"nombre": "a.pdf", "ruta": "data/documents/EPIs/1/a.pdf"}});
        assert_eq!(owned_file_refs(EntityKind::Epi, &epi).len(), 1);

        let abs = json!({"justificante": null});
        assert!(owned_file_refs(EntityKind::Ausencia, &abs).is_empty());
    }

    #[tokio::test]
    async fn test_save_adds_timestamp_on_collision() {
        let dir = TempDir::new().unwrap();
        let storage = DocumentStorage::new(StorageConfig::new(dir.path()));
        let folder = storage.category_folder("Otros", None);

        let first = storage.save(&folder, "parte horas.pdf", b"a").await.unwrap();
        let second = storage.save(&folder, "parte horas.pdf", b"b").await.unwrap();

        assert_eq!(first, "data/documents/Otros/general/parte_horas.pdf");
        assert_ne!(first, second);
        assert!(second.starts_with("data/documents/Otros/general/parte_horas_"));
        assert!(second.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_remove_file_drops_empty_parent() {
        let dir = TempDir::new().unwrap();
        let storage = DocumentStorage::new(StorageConfig::new(dir.path()));
        let folder = storage.category_folder("PRL", Some(3));
        let relative = storage.save(&folder, "curso.pdf", b"x").await.unwrap();

        let mut report = RemovalReport::default();
        storage.remove_file(&relative, &mut report).await.unwrap();
        assert_eq!(report.removed, vec![relative]);
        assert!(!folder.exists());
        assert!(dir.path().join("data/documents/PRL").exists());

        // Segunda vez: no-op
        let mut again = RemovalReport::default();
        storage
            .remove_file("data/documents/PRL/3/curso.pdf", &mut again)
            .await
            .unwrap();
        assert!(again.removed.is_empty());
    }

    #[tokio::test]
    async fn test_remove_file_refuses_escaping_paths() {
        let dir = TempDir::new().unwrap();
        let storage = DocumentStorage::new(StorageConfig::new(dir.path()));
        let mut report = RemovalReport::default();
        storage.remove_file("../fuera.txt", &mut report).await.unwrap();
        assert!(report.removed.is_empty());
        assert_eq!(report.warnings.len(), 1);
    }
}
