//! Modelo de Servicio (cliente / contrato de reparto)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::document::Attachment;
use super::entity::{deserialize_id, deserialize_id_list, Entity, EntityKind};
use crate::utils::validation::{validate_nif, validate_optional_email};

/// Persona de contacto del cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceContact {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub email: String,
}

/// Empleado asignado al servicio durante un periodo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeAssignment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id_empleado: i64,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Service {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(default)]
    #[validate(length(min = 1, message = "El nombre del servicio es obligatorio"))]
    pub nombre: String,

    #[serde(default)]
    #[validate(custom = "validate_nif")]
    pub nif: String,

    #[serde(default)]
    pub empresa: String,

    #[serde(default)]
    pub direccion: String,

    #[serde(default)]
    pub telefono: String,

    #[serde(default)]
    #[validate(custom = "validate_optional_email")]
    pub correo: String,

    #[serde(default)]
    pub representante: String,

    #[serde(default)]
    pub responsables: Vec<ServiceContact>,

    #[serde(default)]
    pub dimension: i64,

    /// "Transferencia", "Domiciliación", "Efectivo", "Otro"
    #[serde(default)]
    pub forma_pago: String,

    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,

    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,

    #[serde(default)]
    pub num_motos: i64,

    #[serde(default)]
    pub empleados_asignados: Vec<EmployeeAssignment>,

    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub vehiculos_asignados: Vec<i64>,

    #[serde(default)]
    pub documentos: Vec<Attachment>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    /// Activo mientras no tenga fecha de fin ya cumplida
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.fecha_fin.map_or(true, |fin| fin >= today)
    }
}

impl Entity for Service {
    const KIND: EntityKind = EntityKind::Servicio;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.nombre = self.nombre.trim().to_string();
        self.nif = self.nif.trim().to_uppercase();
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        self.empleados_asignados
            .iter()
            .map(|a| (EntityKind::Empleado, a.id_empleado))
            .chain(self.vehiculos_asignados.iter().map(|id| (EntityKind::Vehiculo, *id)))
            .collect()
    }
}
