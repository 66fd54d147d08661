//! Modelo de Documento (repositorio central de documentación) y adjuntos

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::entity::{deserialize_id, deserialize_optional_id, Entity, EntityKind};

/// Fichero adjunto a un registro (`{nombre, ruta}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub nombre: String,
    /// Ruta relativa a la carpeta base
    pub ruta: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Document {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(default)]
    #[validate(length(min = 1, message = "La categoría es obligatoria"))]
    pub categoria: String,

    #[serde(default)]
    pub descripcion: String,

    /// Ruta relativa del fichero
    #[serde(default)]
    pub archivo: Option<String>,

    /// Id de la entidad asignada (empleado, servicio o vehículo según categoría)
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub asignacion: Option<i64>,

    #[serde(default)]
    pub fecha_subida: Option<NaiveDateTime>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Document {
    const KIND: EntityKind = EntityKind::Documento;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.categoria = self.categoria.trim().to_string();
    }
}

/// Tipo de entidad al que se asigna un documento según su categoría
pub fn category_target(categoria: &str) -> Option<EntityKind> {
    match categoria {
        "Contrato Empleado" | "PRL" | "Reconocimiento Médico" | "EPIs" => Some(EntityKind::Empleado),
        "Contrato Servicio" => Some(EntityKind::Servicio),
        "Documentación Vehículo" => Some(EntityKind::Vehiculo),
        _ => None,
    }
}
