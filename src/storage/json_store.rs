//! Almacenamiento en ficheros JSON
//!
//! Cada store es un array plano de registros en `data/<store>.json`.
//! Un único `JsonStore` por fichero serializa todos los ciclos
//! leer-modificar-escribir con un mutex asíncrono.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::models::entity::EntityKind;
use crate::utils::errors::AppResult;

/// Estado del fichero en la última lectura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreHealth {
    Ok,
    Missing,
    Corrupt,
}

/// Registros leídos de un store
#[derive(Debug, Clone)]
pub struct Loaded {
    pub records: Vec<Value>,
    pub health: StoreHealth,
    pub warning: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// El fichero se leyó corrupto y aún no se ha apartado una copia
    pending_backup: bool,
}

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

/// Acceso exclusivo a un store mientras dure el guard
pub struct StoreGuard<'a> {
    store: &'a JsonStore,
    state: MutexGuard<'a, StoreState>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            store: self,
            state: self.state.lock().await,
        }
    }

    /// Lectura puntual sin mantener el bloqueo
    pub async fn read(&self) -> AppResult<Loaded> {
        self.lock().await.load().await
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl StoreGuard<'_> {
    /// Fichero ausente o vacío → lista vacía. JSON mal formado → lista vacía
    /// con aviso. Solo los errores reales de E/S se propagan.
    pub async fn load(&mut self) -> AppResult<Loaded> {
        let path = &self.store.path;
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store {} no existe todavía", path.display());
                return Ok(Loaded {
                    records: Vec::new(),
                    health: StoreHealth::Missing,
                    warning: None,
                });
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Loaded {
                records: Vec::new(),
                health: StoreHealth::Ok,
                warning: None,
            });
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => Ok(Loaded {
                records,
                health: StoreHealth::Ok,
                warning: None,
            }),
            Ok(_) => Ok(self.corrupt("el contenido no es una lista")),
            Err(e) => Ok(self.corrupt(&e.to_string())),
        }
    }

    fn corrupt(&mut self, reason: &str) -> Loaded {
        let name = self.store.file_name();
        warn!("⚠️ Store {} corrupto ({}), se lee como vacío", name, reason);
        self.state.pending_backup = true;
        Loaded {
            records: Vec::new(),
            health: StoreHealth::Corrupt,
            warning: Some(format!(
                "El fichero {} está corrupto y se ha leído como vacío",
                name
            )),
        }
    }

    /// Escritura atómica: fichero temporal + fsync + rename
    pub async fn save(&mut self, records: &[Value]) -> AppResult<()> {
        let path = &self.store.path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if self.state.pending_backup {
            if fs::try_exists(path).await? {
                let backup = backup_path(path);
                fs::copy(path, &backup).await?;
                warn!("💾 Copia del store corrupto guardada en {}", backup.display());
            }
            self.state.pending_backup = false;
        }

        let body = serde_json::to_vec_pretty(records)?;
        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await?;

        debug!("💾 {} guardado ({} registros)", path.display(), records.len());
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".corrupt-{}", stamp));
    PathBuf::from(name)
}

/// Registro de todos los stores de la aplicación
#[derive(Debug)]
pub struct DataStore {
    config: StorageConfig,
    stores: HashMap<EntityKind, JsonStore>,
    trash: JsonStore,
}

impl DataStore {
    pub fn new(config: StorageConfig) -> Self {
        let stores = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, JsonStore::new(config.store_path(kind))))
            .collect();
        let trash = JsonStore::new(config.trash_path());
        Self {
            config,
            stores,
            trash,
        }
    }

    /// Crear `data/` y `data/documents/` si no existen
    pub async fn initialize(&self) -> AppResult<()> {
        fs::create_dir_all(self.config.documents_dir()).await?;
        info!("📁 Directorio de datos: {}", self.config.data_dir().display());
        Ok(())
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn store(&self, kind: EntityKind) -> &JsonStore {
        // El mapa se construye con todos los tipos en `new`
        &self.stores[&kind]
    }

    pub fn trash(&self) -> &JsonStore {
        &self.trash
    }

    /// Estado de cada fichero, para `/health`
    pub async fn health(&self) -> AppResult<Vec<(String, StoreHealth)>> {
        let mut report = Vec::with_capacity(self.stores.len() + 1);
        for kind in EntityKind::ALL {
            let loaded = self.store(kind).read().await?;
            report.push((kind.file_name().to_string(), loaded.health));
        }
        let trash = self.trash.read().await?;
        report.push((crate::config::storage::TRASH_FILE.to_string(), trash.health));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("empleados.json"));
        let loaded = store.read().await.unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.health, StoreHealth::Missing);
    }

    #[tokio::test]
    async fn test_empty_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empleados.json");
        std::fs::write(&path, "  \n").unwrap();
        let loaded = JsonStore::new(&path).read().await.unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.health, StoreHealth::Ok);
    }

    #[tokio::test]
    async fn test_malformed_file_reads_as_empty_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vehiculos.json");
        std::fs::write(&path, "[{\"id\": 1,").unwrap();
        let loaded = JsonStore::new(&path).read().await.unwrap();
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.health, StoreHealth::Corrupt);
        assert!(loaded.warning.unwrap().contains("vehiculos.json"));
    }

    #[tokio::test]
    async fn test_object_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("epis.json");
        std::fs::write(&path, "{\"id\": 1}").unwrap();
        let loaded = JsonStore::new(&path).read().await.unwrap();
        assert_eq!(loaded.health, StoreHealth::Corrupt);
    }

    #[tokio::test]
    async fn test_save_backs_up_corrupt_file_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("servicios.json");
        std::fs::write(&path, "no es json").unwrap();

        let store = JsonStore::new(&path);
        let mut guard = store.lock().await;
        guard.load().await.unwrap();
        guard.save(&[json!({"id": 1, "nombre": "Centro"})]).await.unwrap();
        drop(guard);

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(std::fs::read_to_string(backups[0].path()).unwrap(), "no es json");

        let loaded = store.read().await.unwrap();
        assert_eq!(loaded.records, vec![json!({"id": 1, "nombre": "Centro"})]);
    }

    #[tokio::test]
    async fn test_save_writes_unescaped_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ausencias.json");
        let store = JsonStore::new(&path);
        store
            .lock()
            .await
            .save(&[json!({"motivo": "Baja médica"})])
            .await
            .unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Baja médica"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_data_store_initialize_creates_documents_dir() {
        let dir = TempDir::new().unwrap();
        let data = DataStore::new(StorageConfig::new(dir.path()));
        data.initialize().await.unwrap();
        assert!(dir.path().join("data").join("documents").is_dir());

        let health = data.health().await.unwrap();
        assert_eq!(health.len(), 8);
        assert!(health.iter().all(|(_, h)| *h == StoreHealth::Missing));
    }
}
