use std::sync::Arc;

use crate::dto::trash_dto::TrashEntryResponse;
use crate::dto::ApiResponse;
use crate::models::entity::Entity;
use crate::models::session::SessionContext;
use crate::repositories::EntityRepository;
use crate::storage::DataStore;
use crate::utils::errors::AppError;

/// CRUD común a todos los tipos de entidad
pub struct EntityController<T: Entity> {
    repository: EntityRepository<T>,
}

impl<T: Entity> EntityController<T> {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self {
            repository: EntityRepository::new(data),
        }
    }

    pub async fn list(&self) -> Result<ApiResponse<Vec<T>>, AppError> {
        Ok(self.repository.list().await?.into())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<ApiResponse<T>, AppError> {
        Ok(self.repository.get(id).await?.into())
    }

    pub async fn create(&self, item: T) -> Result<ApiResponse<T>, AppError> {
        let outcome = self.repository.create(item).await?;
        Ok(ApiResponse::success_with_message(
            outcome.value,
            format!("{} creado exitosamente", capitalize(T::KIND.as_str())),
        )
        .with_warnings(outcome.warnings))
    }

    pub async fn update(&self, id: i64, item: T) -> Result<ApiResponse<T>, AppError> {
        let outcome = self.repository.update(id, item).await?;
        Ok(ApiResponse::success_with_message(
            outcome.value,
            format!("{} actualizado exitosamente", capitalize(T::KIND.as_str())),
        )
        .with_warnings(outcome.warnings))
    }

    /// Envía el registro a la papelera
    pub async fn delete(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> Result<ApiResponse<TrashEntryResponse>, AppError> {
        if T::KIND.delete_requires_admin() {
            session.require_admin(&format!("delete {}", T::KIND))?;
        }

        let outcome = self.repository.soft_delete(id).await?;
        tracing::info!("👤 {} envió {} {} a la papelera", session.username, T::KIND, id);
        Ok(ApiResponse::success_with_message(
            TrashEntryResponse::from(outcome.value),
            "Enviado a la papelera".to_string(),
        )
        .with_warnings(outcome.warnings))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
