use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::dto::trash_dto::{EmptyTrashQuery, TrashEntryResponse, TrashListQuery};
use crate::dto::ApiResponse;
use crate::models::entity::EntityKind;
use crate::models::session::SessionContext;
use crate::repositories::trash_repository::{EmptyResult, PurgeResult, RestoreResult};
use crate::repositories::{TrashFilter, TrashRepository};
use crate::storage::DataStore;
use crate::utils::errors::{bad_request_error, AppError};

pub struct TrashController {
    repository: TrashRepository,
}

impl TrashController {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self {
            repository: TrashRepository::new(data),
        }
    }

    pub async fn list(
        &self,
        query: TrashListQuery,
    ) -> Result<ApiResponse<Vec<TrashEntryResponse>>, AppError> {
        let tipo = match query.tipo.as_deref().map(str::trim) {
            None | Some("") | Some("todos") => None,
            Some(raw) => Some(raw.parse::<EntityKind>().map_err(|e| bad_request_error(&e))?),
        };
        let filter = TrashFilter {
            tipo,
            buscar: query.buscar,
        };

        let outcome = self.repository.list(&filter).await?;
        Ok(outcome
            .map(|entries| entries.into_iter().map(TrashEntryResponse::from).collect())
            .into())
    }

    pub async fn get_by_id(&self, trash_id: Uuid) -> Result<ApiResponse<TrashEntryResponse>, AppError> {
        Ok(self.repository.get(trash_id).await?.map(TrashEntryResponse::from).into())
    }

    pub async fn restore(
        &self,
        session: &SessionContext,
        trash_id: Uuid,
    ) -> Result<ApiResponse<RestoreResult>, AppError> {
        let outcome = self.repository.restore(trash_id).await?;
        info!("👤 {} restauró {}", session.username, trash_id);

        let message = if outcome.value.reassigned {
            format!(
                "Restaurado con nuevo id {} (el original estaba ocupado)",
                outcome.value.restored_id
            )
        } else {
            "Restaurado correctamente".to_string()
        };
        Ok(ApiResponse::success_with_message(outcome.value, message).with_warnings(outcome.warnings))
    }

    pub async fn purge(
        &self,
        session: &SessionContext,
        trash_id: Uuid,
    ) -> Result<ApiResponse<PurgeResult>, AppError> {
        session.require_admin("purge trash entry")?;
        let outcome = self.repository.purge(trash_id).await?;
        info!("👤 {} purgó {}", session.username, trash_id);
        Ok(outcome.into())
    }

    pub async fn empty(
        &self,
        session: &SessionContext,
        query: EmptyTrashQuery,
    ) -> Result<ApiResponse<EmptyResult>, AppError> {
        session.require_admin("empty trash")?;
        if !query.confirmar {
            return Err(bad_request_error(
                "Vaciar la papelera requiere confirmar=true",
            ));
        }
        let outcome = self.repository.empty().await?;
        info!("👤 {} vació la papelera", session.username);
        Ok(outcome.into())
    }
}
