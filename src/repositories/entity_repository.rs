//! Repositorio genérico por tipo de entidad
//!
//! Las mutaciones trabajan sobre el array JSON crudo para no perder los
//! registros que no encajan en el modelo tipado.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use validator::Validate;

use super::trash_repository::TrashRepository;
use super::Outcome;
use crate::models::entity::{next_id, record_id, Entity};
use crate::models::TrashEntry;
use crate::storage::DataStore;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub struct EntityRepository<T: Entity> {
    data: Arc<DataStore>,
    _entity: PhantomData<T>,
}

impl<T: Entity> EntityRepository<T> {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self {
            data,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> AppResult<Outcome<Vec<T>>> {
        let loaded = self.data.store(T::KIND).read().await?;
        let mut outcome = Outcome::new(Vec::with_capacity(loaded.records.len()));
        outcome.warnings.extend(loaded.warning);

        let mut skipped = 0;
        for record in loaded.records {
            match serde_json::from_value::<T>(record) {
                Ok(item) => outcome.value.push(item),
                Err(e) => {
                    skipped += 1;
                    warn!("⚠️ Registro de {} ignorado: {}", T::KIND, e);
                }
            }
        }
        if skipped > 0 {
            outcome.warnings.push(format!(
                "{} registro(s) de {} no se pudieron leer y se han omitido",
                skipped,
                T::KIND.file_name()
            ));
        }
        Ok(outcome)
    }

    pub async fn get(&self, id: i64) -> AppResult<Outcome<T>> {
        let loaded = self.data.store(T::KIND).read().await?;
        let record = loaded
            .records
            .into_iter()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found_error(T::KIND.as_str(), &id.to_string()))?;

        let item = serde_json::from_value::<T>(record).map_err(|e| {
            bad_request_error(&format!("El registro {} de {} no es válido: {}", id, T::KIND, e))
        })?;
        let mut outcome = Outcome::new(item);
        outcome.warnings.extend(loaded.warning);
        Ok(outcome)
    }

    /// Alta con id secuencial (máximo + 1)
    pub async fn create(&self, mut item: T) -> AppResult<Outcome<T>> {
        item.normalize();
        item.validate()?;
        self.check_references(&item).await?;

        let mut guard = self.data.store(T::KIND).lock().await;
        let mut loaded = guard.load().await?;

        let id = next_id(&loaded.records)?;
        item.set_id(id);
        loaded.records.push(serde_json::to_value(&item)?);
        guard.save(&loaded.records).await?;

        info!("✅ {} creado con id {}", T::KIND, id);
        let mut outcome = Outcome::new(item);
        outcome.warnings.extend(loaded.warning);
        Ok(outcome)
    }

    /// Sobrescritura completa del registro, conservando el id de la ruta
    pub async fn update(&self, id: i64, mut item: T) -> AppResult<Outcome<T>> {
        item.set_id(id);
        item.normalize();
        item.validate()?;
        self.check_references(&item).await?;

        let mut guard = self.data.store(T::KIND).lock().await;
        let mut loaded = guard.load().await?;

        let slot = loaded
            .records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| not_found_error(T::KIND.as_str(), &id.to_string()))?;
        *slot = serde_json::to_value(&item)?;
        guard.save(&loaded.records).await?;

        info!("✏️ {} {} actualizado", T::KIND, id);
        let mut outcome = Outcome::new(item);
        outcome.warnings.extend(loaded.warning);
        Ok(outcome)
    }

    /// Mueve el registro a la papelera
    pub async fn soft_delete(&self, id: i64) -> AppResult<Outcome<TrashEntry>> {
        TrashRepository::new(self.data.clone())
            .soft_delete(T::KIND, id)
            .await
    }

    async fn check_references(&self, item: &T) -> AppResult<()> {
        for (kind, id) in item.references() {
            let loaded = self.data.store(kind).read().await?;
            if !loaded.records.iter().any(|r| record_id(r) == Some(id)) {
                return Err(bad_request_error(&format!(
                    "No existe {} con id {}",
                    kind, id
                )));
            }
        }
        Ok(())
    }
}

/// Registro crudo por id, para operaciones que editan el JSON directamente
pub fn find_raw_mut(records: &mut [Value], id: i64) -> Option<&mut Value> {
    records.iter_mut().find(|r| record_id(r) == Some(id))
}
