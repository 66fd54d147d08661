//! Modelo de Empleado
//!
//! Mapea exactamente a los registros de `data/empleados.json`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::entity::{deserialize_id, Entity, EntityKind};
use crate::utils::validation::{validate_dni, validate_optional_email, validate_optional_phone};

/// Estado laboral del empleado
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Activo,
    Baja,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Employee {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(default)]
    #[validate(length(min = 1, message = "Nombre y apellidos obligatorios"))]
    pub nombre: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Nombre y apellidos obligatorios"))]
    pub apellidos: String,

    #[serde(default)]
    #[validate(custom = "validate_dni")]
    pub dni: String,

    #[serde(default)]
    #[validate(custom = "validate_optional_phone")]
    pub telefono: String,

    #[serde(default)]
    #[validate(custom = "validate_optional_email")]
    pub correo: String,

    #[serde(default)]
    pub puesto: String,

    #[serde(default)]
    pub ubicacion: String,

    #[serde(default)]
    pub estado: EmployeeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_baja: Option<NaiveDate>,

    /// Ruta relativa de la foto
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nombre, self.apellidos).trim().to_string()
    }

    /// Activo si no está de baja ni tiene fecha de baja ya cumplida
    pub fn is_active(&self) -> bool {
        let today = Utc::now().date_naive();
        self.estado == EmployeeStatus::Activo
            && self.fecha_baja.map_or(true, |fecha| fecha > today)
    }
}

impl Entity for Employee {
    const KIND: EntityKind = EntityKind::Empleado;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.nombre = self.nombre.trim().to_string();
        self.apellidos = self.apellidos.trim().to_string();
        self.dni = self.dni.trim().to_uppercase();
    }
}
