//! DTOs de la papelera

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{EntityKind, TrashEntry};

/// `GET /api/papelera?tipo=&buscar=`
#[derive(Debug, Default, Deserialize)]
pub struct TrashListQuery {
    pub tipo: Option<String>,
    pub buscar: Option<String>,
}

/// `DELETE /api/papelera?confirmar=true`
#[derive(Debug, Default, Deserialize)]
pub struct EmptyTrashQuery {
    #[serde(default)]
    pub confirmar: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrashEntryResponse {
    pub id: Uuid,
    pub tipo: EntityKind,
    pub titulo: String,
    pub original_id: Option<i64>,
    pub fecha: Option<String>,
    pub contenido: Value,
}

impl From<TrashEntry> for TrashEntryResponse {
    fn from(entry: TrashEntry) -> Self {
        Self {
            id: entry.id,
            tipo: entry.tipo,
            titulo: entry.title(),
            original_id: entry.original_id(),
            fecha: entry.fecha,
            contenido: entry.contenido,
        }
    }
}
