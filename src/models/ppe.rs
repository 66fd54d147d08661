//! Modelo de entrega de EPIs (equipos de protección individual)

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::document::Attachment;
use super::entity::{deserialize_id, Entity, EntityKind};

/// EPIs que todo empleado activo debe tener entregados
pub const MANDATORY_PPE: [&str; 4] = ["Pantalón largo", "Camiseta", "Calzado", "Chubasquero"];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PpeDelivery {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(deserialize_with = "deserialize_id")]
    pub empleado_id: i64,

    #[serde(default)]
    #[validate(length(min = 1, message = "El tipo de EPI es obligatorio"))]
    pub tipo: String,

    #[serde(default)]
    pub entregado: bool,

    #[serde(default)]
    pub talla: Option<String>,

    #[serde(default)]
    pub fecha_entrega: Option<NaiveDate>,

    #[serde(default)]
    pub observaciones: Option<String>,

    #[serde(default)]
    pub documento: Option<Attachment>,

    #[serde(default)]
    pub creado_en: Option<NaiveDateTime>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for PpeDelivery {
    const KIND: EntityKind = EntityKind::Epi;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.tipo = self.tipo.trim().to_string();
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        vec![(EntityKind::Empleado, self.empleado_id)]
    }
}

/// EPIs obligatorios que le faltan a un empleado según sus entregas
pub fn missing_mandatory<'a>(
    empleado_id: i64,
    deliveries: impl IntoIterator<Item = &'a PpeDelivery>,
) -> Vec<&'static str> {
    let delivered: Vec<&str> = deliveries
        .into_iter()
        .filter(|d| d.empleado_id == empleado_id && d.entregado)
        .map(|d| d.tipo.as_str())
        .collect();

    MANDATORY_PPE
        .into_iter()
        .filter(|tipo| !delivered.contains(tipo))
        .collect()
}
