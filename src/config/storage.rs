//! Configuración de almacenamiento
//!
//! Distribución en disco de los ficheros JSON y de los documentos adjuntos.
//! Las rutas guardadas en los registros son relativas a `base_dir`.

use std::path::{Component, Path, PathBuf};

use crate::models::entity::EntityKind;

pub const DATA_DIR: &str = "data";
pub const DOCUMENTS_DIR: &str = "documents";
pub const TRASH_FILE: &str = "papelera.json";

/// Configuración del almacenamiento en ficheros
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub base_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(DATA_DIR)
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir().join(DOCUMENTS_DIR)
    }

    /// Fichero JSON de un tipo de entidad
    pub fn store_path(&self, kind: EntityKind) -> PathBuf {
        self.data_dir().join(kind.file_name())
    }

    pub fn trash_path(&self) -> PathBuf {
        self.data_dir().join(TRASH_FILE)
    }

    /// Carpeta de documentos propia de una entidad, p.ej. `documents/vehicles/veh_7`
    pub fn entity_folder(&self, kind: EntityKind, id: i64) -> Option<PathBuf> {
        kind.owned_folder(id)
            .map(|segment| self.documents_dir().join(segment))
    }

    /// Resolver una ruta guardada en un registro. Rechaza rutas absolutas o con `..`.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = relative.trim();
        if relative.is_empty() {
            return None;
        }
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        safe.then(|| self.base_dir.join(path))
    }

    /// Ruta relativa a `base_dir`, con `/` como separador, para guardar en un registro
    pub fn relative_to_base(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.base_dir).unwrap_or(path);
        relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_paths_live_under_data() {
        let config = StorageConfig::new("/srv/prode");
        assert_eq!(
            config.store_path(EntityKind::Empleado),
            PathBuf::from("/srv/prode/data/empleados.json")
        );
        assert_eq!(config.trash_path(), PathBuf::from("/srv/prode/data/papelera.json"));
    }

    #[test]
    fn test_entity_folder_per_kind() {
        let config = StorageConfig::new("/srv/prode");
        assert_eq!(
            config.entity_folder(EntityKind::Vehiculo, 7),
            Some(PathBuf::from("/srv/prode/data/documents/vehicles/veh_7"))
        );
        assert_eq!(config.entity_folder(EntityKind::Ausencia, 7), None);
    }

    #[test]
    fn test_resolve_refuses_escaping_paths() {
        let config = StorageConfig::new("/srv/prode");
        assert_eq!(
            config.resolve("data/documents/Otros/general/a.pdf"),
            Some(PathBuf::from("/srv/prode/data/documents/Otros/general/a.pdf"))
        );
        assert_eq!(config.resolve("../etc/passwd"), None);
        assert_eq!(config.resolve("/etc/passwd"), None);
        assert_eq!(config.resolve("  "), None);
    }

    #[test]
    fn test_relative_to_base() {
        let config = StorageConfig::new("/srv/prode");
        let path = PathBuf::from("/srv/prode/data/documents/vehicles/veh_7/itv.pdf");
        assert_eq!(
            config.relative_to_base(&path),
            "data/documents/vehicles/veh_7/itv.pdf"
        );
    }
}
