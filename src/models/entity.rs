//! Tipos de entidad y contrato común de los registros persistidos
//!
//! Cada tipo de entidad vive en su propio fichero JSON (`data/<store>.json`)
//! como un array plano de registros con `id` numérico.

use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::utils::errors::{AppError, AppResult};

/// Discriminador de tipo, tal y como se guarda en `papelera.json` (`tipo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Empleado,
    Vehiculo,
    Servicio,
    Ausencia,
    Epi,
    Mantenimiento,
    Documento,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Empleado,
        EntityKind::Vehiculo,
        EntityKind::Servicio,
        EntityKind::Ausencia,
        EntityKind::Epi,
        EntityKind::Mantenimiento,
        EntityKind::Documento,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Empleado => "empleado",
            EntityKind::Vehiculo => "vehiculo",
            EntityKind::Servicio => "servicio",
            EntityKind::Ausencia => "ausencia",
            EntityKind::Epi => "epi",
            EntityKind::Mantenimiento => "mantenimiento",
            EntityKind::Documento => "documento",
        }
    }

    /// Nombre del fichero del store bajo `data/`
    pub fn file_name(&self) -> &'static str {
        match self {
            EntityKind::Empleado => "empleados.json",
            EntityKind::Vehiculo => "vehiculos.json",
            EntityKind::Servicio => "servicios.json",
            EntityKind::Ausencia => "ausencias.json",
            EntityKind::Epi => "epis.json",
            EntityKind::Mantenimiento => "mantenimiento.json",
            EntityKind::Documento => "documentacion.json",
        }
    }

    /// Segmento de URL de la colección (`/api/<collection>`)
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Empleado => "empleados",
            EntityKind::Vehiculo => "vehiculos",
            EntityKind::Servicio => "servicios",
            EntityKind::Ausencia => "ausencias",
            EntityKind::Epi => "epis",
            EntityKind::Mantenimiento => "mantenimiento",
            EntityKind::Documento => "documentacion",
        }
    }

    /// Carpeta de documentos indexada por id, relativa a `data/documents`
    pub fn owned_folder(&self, id: i64) -> Option<String> {
        match self {
            EntityKind::Empleado => Some(format!("epis/emp_{}", id)),
            EntityKind::Vehiculo => Some(format!("vehicles/veh_{}", id)),
            EntityKind::Servicio => Some(format!("services/service_{}", id)),
            _ => None,
        }
    }

    /// Solo admin puede mandar servicios a la papelera
    pub fn delete_requires_admin(&self) -> bool {
        matches!(self, EntityKind::Servicio)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Tipo de entidad desconocido: {}", s))
    }
}

/// Contrato común de los registros de cada store
pub trait Entity: Serialize + DeserializeOwned + Validate + Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Normalización previa a la validación (mayúsculas, recortes...)
    fn normalize(&mut self) {}

    /// Registros de otros stores que deben existir (`(tipo, id)`)
    fn references(&self) -> Vec<(EntityKind, i64)> {
        Vec::new()
    }
}

/// Id numérico de un registro JSON. Acepta enteros guardados como texto.
pub fn record_id(record: &Value) -> Option<i64> {
    match record.get("id")? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Siguiente id secuencial: máximo existente + 1, o 1 si no hay ninguno
pub fn next_id(records: &[Value]) -> AppResult<i64> {
    match records.iter().filter_map(record_id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            AppError::Conflict(format!(
                "No quedan ids libres: el máximo existente es {}",
                max
            ))
        }),
    }
}

/// Id tal y como puede aparecer en los ficheros: número o texto numérico
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl StoredId {
    fn into_id<E: de::Error>(self) -> Result<i64, E> {
        match self {
            StoredId::Int(id) => Ok(id),
            StoredId::Float(f) if f.fract() == 0.0 => Ok(f as i64),
            StoredId::Float(f) => Err(E::custom(format!("id no entero: {}", f))),
            StoredId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("id no numérico: {:?}", s))),
        }
    }
}

/// `deserialize_with` para ids y referencias que pueden venir como texto
pub fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    StoredId::deserialize(deserializer)?.into_id()
}

pub fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Option::<StoredId>::deserialize(deserializer)?
        .map(StoredId::into_id)
        .transpose()
}

pub fn deserialize_id_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<i64>, D::Error> {
    Vec::<StoredId>::deserialize(deserializer)?
        .into_iter()
        .map(StoredId::into_id)
        .collect()
}
