//! Modelo de Mantenimiento de vehículos (ITV, revisiones, reparaciones)

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::entity::{deserialize_id, Entity, EntityKind};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Maintenance {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(deserialize_with = "deserialize_id")]
    pub vehiculo_id: i64,

    /// "ITV", "Revisión", "Reparación", "Neumáticos", "Otro"
    #[serde(default)]
    #[validate(length(min = 1, message = "El tipo de mantenimiento es obligatorio"))]
    pub tipo: String,

    pub fecha: NaiveDate,

    /// Fecha del próximo mantenimiento
    #[serde(default)]
    pub proxima: Option<NaiveDate>,

    #[serde(default)]
    pub taller: Option<String>,

    #[serde(default)]
    pub descripcion: Option<String>,

    #[serde(default)]
    pub coste: Option<Decimal>,

    /// Ruta relativa de la factura / justificante
    #[serde(default)]
    pub archivo: Option<String>,

    #[serde(default)]
    pub registrado_en: Option<NaiveDateTime>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Maintenance {
    pub fn is_itv(&self) -> bool {
        self.tipo.eq_ignore_ascii_case("ITV")
    }

    /// Días hasta el próximo mantenimiento (negativo si ya venció)
    pub fn days_until_next(&self, today: NaiveDate) -> Option<i64> {
        self.proxima.map(|next| (next - today).num_days())
    }
}

impl Entity for Maintenance {
    const KIND: EntityKind = EntityKind::Mantenimiento;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        vec![(EntityKind::Vehiculo, self.vehiculo_id)]
    }
}
