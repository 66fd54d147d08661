//! Entradas de la papelera (`papelera.json`)
//!
//! Cada entrada envuelve el registro original completo (`contenido`) junto
//! con su tipo, la fecha de borrado y un identificador propio.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::entity::{record_id, EntityKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashEntry {
    pub id: Uuid,
    pub tipo: EntityKind,
    pub contenido: Value,
    /// RFC 3339; las entradas antiguas pueden traer ISO sin zona o nada
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrashEntry {
    pub fn new(tipo: EntityKind, contenido: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            tipo,
            contenido,
            fecha: Some(Utc::now().to_rfc3339()),
            extra: Map::new(),
        }
    }

    /// Id del registro en su store de origen
    pub fn original_id(&self) -> Option<i64> {
        record_id(&self.contenido)
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.fecha.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    /// Título legible para el listado
    pub fn title(&self) -> String {
        let field = |key: &str| {
            self.contenido
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let title = match self.tipo {
            EntityKind::Empleado | EntityKind::Epi => {
                let full = [field("nombre"), field("apellidos")]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                (!full.is_empty()).then_some(full)
            }
            EntityKind::Vehiculo => field("matricula").map(str::to_string),
            _ => field("nombre").map(str::to_string),
        };

        title.unwrap_or_else(|| match self.original_id() {
            Some(id) => format!("id:{}", id),
            None => "id:?".to_string(),
        })
    }

    /// Búsqueda de texto libre sobre la entrada serializada
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        serde_json::to_string(self)
            .map(|raw| raw.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_titles_per_kind() {
        let emp = TrashEntry::new(EntityKind::Empleado, json!({"id": 1, "nombre": "Ana", "apellidos": "Ruiz"}));
        assert_eq!(emp.title(), "Ana Ruiz");

        let veh = TrashEntry::new(EntityKind::Vehiculo, json!({"id": 7, "matricula": "1234BCD"}));
        assert_eq!(veh.title(), "1234BCD");

        let abs = TrashEntry::new(EntityKind::Ausencia, json!({"id": 3, "empleado_id": 1}));
        assert_eq!(abs.title(), "id:3");
    }

    #[test]
    fn test_deleted_at_accepts_legacy_naive_format() {
        let mut entry = TrashEntry::new(EntityKind::Empleado, json!({"id": 1}));
        assert!(entry.deleted_at().is_some());

        entry.fecha = Some("2025-11-20T10:15:30.123456".to_string());
        assert!(entry.deleted_at().is_some());

        entry.fecha = Some("ayer".to_string());
        assert!(entry.deleted_at().is_none());
    }

    #[test]
    fn test_matches_text_is_case_insensitive() {
        let entry = TrashEntry::new(EntityKind::Servicio, json!({"id": 2, "nombre": "Reparto Centro"}));
        assert!(entry.matches_text("CENTRO"));
        assert!(entry.matches_text(""));
        assert!(!entry.matches_text("norte"));
    }
}
