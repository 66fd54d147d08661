//! Repositorio de la papelera
//!
//! Ciclo de vida: activo → papelera → restaurado | purgado.
//! Orden de bloqueo cuando intervienen dos stores: primero el de origen,
//! después la papelera.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::Outcome;
use crate::models::entity::{next_id, record_id, EntityKind};
use crate::models::TrashEntry;
use crate::storage::documents::owned_file_refs;
use crate::storage::{DataStore, DocumentStorage, RemovalReport, StoreGuard};
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

const UNREADABLE_SUFFIX: &str = "no se pudieron interpretar y se conservan sin cambios";

/// Filtros del listado
#[derive(Debug, Default, Clone)]
pub struct TrashFilter {
    pub tipo: Option<EntityKind>,
    pub buscar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    pub trash_id: Uuid,
    pub tipo: EntityKind,
    pub original_id: Option<i64>,
    pub restored_id: i64,
    pub reassigned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurgeResult {
    pub trash_id: Uuid,
    pub purged: bool,
    pub tipo: Option<EntityKind>,
    pub removed_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmptyResult {
    pub purged: usize,
    /// Entradas irreconocibles eliminadas del fichero
    pub discarded: usize,
    pub removed_files: Vec<String>,
}

/// Contenido de `papelera.json` ya interpretado
struct TrashSnapshot {
    raw: Vec<Value>,
    /// (posición en `raw`, entrada)
    entries: Vec<(usize, TrashEntry)>,
    warnings: Vec<String>,
}

impl TrashSnapshot {
    fn position(&self, trash_id: Uuid) -> Option<(usize, &TrashEntry)> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.id == trash_id)
            .map(|(idx, entry)| (*idx, entry))
    }
}

pub struct TrashRepository {
    data: Arc<DataStore>,
    documents: DocumentStorage,
}

impl TrashRepository {
    pub fn new(data: Arc<DataStore>) -> Self {
        let documents = DocumentStorage::new(data.config().clone());
        Self { data, documents }
    }

    /// Lee la papelera. A las entradas antiguas sin id se les asigna un UUID
    /// y se persiste en el momento. Las entradas irreconocibles se conservan
    /// en el fichero tal cual, hasta vaciar la papelera, y se avisa.
    async fn snapshot(&self, guard: &mut StoreGuard<'_>) -> AppResult<TrashSnapshot> {
        let loaded = guard.load().await?;
        let mut raw = loaded.records;
        let mut warnings: Vec<String> = loaded.warning.into_iter().collect();
        let mut entries = Vec::with_capacity(raw.len());
        let mut migrated = 0;
        let mut unreadable = 0;

        for (idx, value) in raw.iter_mut().enumerate() {
            let Some(obj) = value.as_object_mut() else {
                unreadable += 1;
                continue;
            };
            if !obj.contains_key("tipo") || !obj.contains_key("contenido") {
                unreadable += 1;
                continue;
            }

            let has_uuid = obj
                .get("id")
                .and_then(Value::as_str)
                .map_or(false, |s| Uuid::parse_str(s).is_ok());
            if !has_uuid {
                if let Some(old) = obj.remove("id") {
                    obj.insert("id_legacy".to_string(), old);
                }
                obj.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
                migrated += 1;
            }

            match serde_json::from_value::<TrashEntry>(value.clone()) {
                Ok(entry) => entries.push((idx, entry)),
                Err(e) => {
                    warn!("⚠️ Entrada de papelera irreconocible: {}", e);
                    unreadable += 1;
                }
            }
        }

        if migrated > 0 {
            info!("🔧 Asignados ids a {} entradas antiguas de la papelera", migrated);
            guard.save(&raw).await?;
        }
        if unreadable > 0 {
            warnings.push(format!(
                "{} entrada(s) de la papelera {}",
                unreadable, UNREADABLE_SUFFIX
            ));
        }

        Ok(TrashSnapshot {
            raw,
            entries,
            warnings,
        })
    }

    /// Tipo de una entrada, sin mantener el bloqueo
    async fn peek_kind(&self, trash_id: Uuid) -> AppResult<Option<EntityKind>> {
        let mut guard = self.data.trash().lock().await;
        let snapshot = self.snapshot(&mut guard).await?;
        Ok(snapshot.position(trash_id).map(|(_, entry)| entry.tipo))
    }

    /// Activo → papelera. Se persiste la papelera antes de quitar el
    /// registro del origen: un corte entre ambos deja un duplicado, nunca
    /// una pérdida.
    pub async fn soft_delete(&self, kind: EntityKind, id: i64) -> AppResult<Outcome<TrashEntry>> {
        let mut origin = self.data.store(kind).lock().await;
        let mut trash = self.data.trash().lock().await;

        let mut loaded = origin.load().await?;
        let idx = loaded
            .records
            .iter()
            .position(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found_error(kind.as_str(), &id.to_string()))?;

        let mut snapshot = self.snapshot(&mut trash).await?;
        let entry = TrashEntry::new(kind, loaded.records[idx].clone());
        snapshot.raw.push(serde_json::to_value(&entry)?);
        trash.save(&snapshot.raw).await?;

        loaded.records.remove(idx);
        origin.save(&loaded.records).await?;

        info!("🗑️ {} {} enviado a la papelera ({})", kind, id, entry.id);
        let mut outcome = Outcome::new(entry);
        outcome.warnings.extend(loaded.warning);
        outcome.warnings.extend(snapshot.warnings);
        Ok(outcome)
    }

    /// Más recientes primero; sin fecha legible al final
    pub async fn list(&self, filter: &TrashFilter) -> AppResult<Outcome<Vec<TrashEntry>>> {
        let mut guard = self.data.trash().lock().await;
        let snapshot = self.snapshot(&mut guard).await?;
        drop(guard);

        let mut entries: Vec<TrashEntry> = snapshot
            .entries
            .into_iter()
            .map(|(_, entry)| entry)
            .filter(|entry| filter.tipo.map_or(true, |tipo| entry.tipo == tipo))
            .filter(|entry| {
                filter
                    .buscar
                    .as_deref()
                    .map_or(true, |needle| entry.matches_text(needle))
            })
            .collect();
        entries.sort_by_key(|entry| Reverse(entry.deleted_at()));

        let mut outcome = Outcome::new(entries);
        outcome.warnings = snapshot.warnings;
        Ok(outcome)
    }

    pub async fn get(&self, trash_id: Uuid) -> AppResult<Outcome<TrashEntry>> {
        let mut guard = self.data.trash().lock().await;
        let snapshot = self.snapshot(&mut guard).await?;
        let entry = snapshot
            .position(trash_id)
            .map(|(_, entry)| entry.clone())
            .ok_or_else(|| not_found_error("papelera", &trash_id.to_string()))?;

        let mut outcome = Outcome::new(entry);
        outcome.warnings = snapshot.warnings;
        Ok(outcome)
    }

    /// Papelera → activo. Conserva el id original si está libre; si no,
    /// asigna máximo + 1.
    pub async fn restore(&self, trash_id: Uuid) -> AppResult<Outcome<RestoreResult>> {
        let kind = self
            .peek_kind(trash_id)
            .await?
            .ok_or_else(|| not_found_error("papelera", &trash_id.to_string()))?;

        let mut origin = self.data.store(kind).lock().await;
        let mut trash = self.data.trash().lock().await;

        let mut snapshot = self.snapshot(&mut trash).await?;
        let (idx, entry) = snapshot
            .position(trash_id)
            .map(|(idx, entry)| (idx, entry.clone()))
            .ok_or_else(|| not_found_error("papelera", &trash_id.to_string()))?;

        let mut record = entry.contenido.clone();
        let Some(fields) = record.as_object_mut() else {
            return Err(bad_request_error(
                "El contenido de la entrada no es un registro válido",
            ));
        };

        let mut loaded = origin.load().await?;
        let original_id = entry.original_id();
        let taken = |id: i64| loaded.records.iter().any(|r| record_id(r) == Some(id));
        let restored_id = match original_id {
            Some(id) if !taken(id) => id,
            _ => next_id(&loaded.records)?,
        };
        let reassigned = original_id != Some(restored_id);
        fields.insert("id".to_string(), Value::from(restored_id));

        loaded.records.push(record);
        origin.save(&loaded.records).await?;

        snapshot.raw.remove(idx);
        trash.save(&snapshot.raw).await?;

        if reassigned {
            warn!(
                "♻️ {} restaurado con id {} (original {:?} ocupado) desde {}",
                kind, restored_id, original_id, trash_id
            );
        } else {
            info!("♻️ {} {} restaurado desde {}", kind, restored_id, trash_id);
        }

        let mut outcome = Outcome::new(RestoreResult {
            trash_id,
            tipo: kind,
            original_id,
            restored_id,
            reassigned,
        });
        outcome.warnings.extend(loaded.warning);
        outcome.warnings.extend(snapshot.warnings);
        Ok(outcome)
    }

    /// Borrado definitivo de una entrada y de sus ficheros. Idempotente:
    /// si la entrada ya no existe devuelve `purged: false`.
    pub async fn purge(&self, trash_id: Uuid) -> AppResult<Outcome<PurgeResult>> {
        let Some(kind) = self.peek_kind(trash_id).await? else {
            info!("Purga de {} sin efecto: la entrada ya no existe", trash_id);
            return Ok(Outcome::new(PurgeResult {
                trash_id,
                purged: false,
                tipo: None,
                removed_files: Vec::new(),
            }));
        };

        let mut origin = self.data.store(kind).lock().await;
        let mut trash = self.data.trash().lock().await;

        let mut snapshot = self.snapshot(&mut trash).await?;
        let Some((idx, entry)) = snapshot
            .position(trash_id)
            .map(|(idx, entry)| (idx, entry.clone()))
        else {
            return Ok(Outcome::new(PurgeResult {
                trash_id,
                purged: false,
                tipo: None,
                removed_files: Vec::new(),
            }));
        };

        let live = origin.load().await?;
        let mut report = RemovalReport::default();

        for relative in owned_file_refs(kind, &entry.contenido) {
            self.documents.remove_file(&relative, &mut report).await?;
        }

        if let Some(id) = entry.original_id() {
            if let Some(folder) = self.data.config().entity_folder(kind, id) {
                if live.records.iter().any(|r| record_id(r) == Some(id)) {
                    warn!(
                        "⚠️ Carpeta {} conservada: hay un {} activo con id {}",
                        folder.display(),
                        kind,
                        id
                    );
                    report.warnings.push(format!(
                        "No se borra la carpeta de {} {}: existe un registro activo con ese id",
                        kind, id
                    ));
                } else {
                    self.documents.remove_folder(&folder, &mut report).await?;
                }
            }
        }

        snapshot.raw.remove(idx);
        trash.save(&snapshot.raw).await?;

        info!(
            "🔥 {} {:?} purgado de la papelera ({}), {} ruta(s) borradas",
            kind,
            entry.original_id(),
            trash_id,
            report.removed.len()
        );

        let mut outcome = Outcome::new(PurgeResult {
            trash_id,
            purged: true,
            tipo: Some(kind),
            removed_files: report.removed,
        });
        outcome.warnings = snapshot.warnings;
        outcome.warnings.extend(report.warnings);
        Ok(outcome)
    }

    /// Vaciar la papelera: purga cada entrada y descarta las que no se
    /// pueden interpretar
    pub async fn empty(&self) -> AppResult<Outcome<EmptyResult>> {
        let ids: Vec<Uuid> = {
            let mut guard = self.data.trash().lock().await;
            let snapshot = self.snapshot(&mut guard).await?;
            snapshot.entries.iter().map(|(_, entry)| entry.id).collect()
        };

        let mut outcome = Outcome::new(EmptyResult {
            purged: 0,
            discarded: 0,
            removed_files: Vec::new(),
        });
        for trash_id in ids {
            let purged = self.purge(trash_id).await?;
            if purged.value.purged {
                outcome.value.purged += 1;
            }
            outcome.value.removed_files.extend(purged.value.removed_files);
            outcome.warnings.extend(purged.warnings);
        }
        outcome.value.discarded = self.discard_unreadable().await?;
        outcome.warnings.retain(|w| !w.ends_with(UNREADABLE_SUFFIX));
        outcome.warnings.dedup();

        info!(
            "🧹 Papelera vaciada: {} entradas purgadas, {} descartadas",
            outcome.value.purged, outcome.value.discarded
        );
        Ok(outcome)
    }

    /// Quita del fichero las entradas sin forma `{tipo, contenido}`.
    /// Las entradas válidas añadidas mientras tanto se conservan.
    async fn discard_unreadable(&self) -> AppResult<usize> {
        let mut guard = self.data.trash().lock().await;
        let snapshot = self.snapshot(&mut guard).await?;
        let keep: HashSet<usize> = snapshot.entries.iter().map(|(idx, _)| *idx).collect();
        let total = snapshot.raw.len();

        let remaining: Vec<Value> = snapshot
            .raw
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| keep.contains(idx))
            .map(|(_, value)| value)
            .collect();
        let discarded = total - remaining.len();
        if discarded > 0 {
            warn!("🧹 {} entrada(s) irreconocibles eliminadas de la papelera", discarded);
            guard.save(&remaining).await?;
        }
        Ok(discarded)
    }

    pub async fn count(&self) -> AppResult<usize> {
        let mut guard = self.data.trash().lock().await;
        Ok(self.snapshot(&mut guard).await?.entries.len())
    }
}
