//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus tipos auxiliares.
//! Mapea exactamente a los registros de `data/vehiculos.json`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::document::Attachment;
use super::entity::{deserialize_id, deserialize_optional_id, Entity, EntityKind};
use crate::utils::validation::validate_license_plate;

/// Días de antelación para avisar de la próxima ITV
pub const ITV_WARNING_DAYS: i64 = 30;

/// Propiedad del vehículo
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OwnershipType {
    #[default]
    #[serde(rename = "PRODE")]
    Prode,
    Renting,
    Leasing,
    Otro,
}

/// Tramo del historial de asignaciones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleAssignment {
    #[serde(default)]
    pub servicio: Option<String>,
    #[serde(default)]
    pub empleado: Option<String>,
    pub desde: NaiveDate,
    #[serde(default)]
    pub hasta: Option<NaiveDate>,
}

/// Avería / incidencia con paso por taller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakdown {
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub taller: String,
    #[serde(default)]
    pub tel_taller: String,
    #[serde(default)]
    pub fecha_entrada: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_prevista: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_salida: Option<NaiveDate>,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub coste: Option<Decimal>,
}

/// Estado de la ITV respecto a una fecha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "estado", content = "dias", rename_all = "snake_case")]
pub enum ItvStatus {
    Caducada,
    Proxima(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Vehicle {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(default)]
    #[validate(custom = "validate_license_plate")]
    pub matricula: String,

    #[serde(default)]
    pub bastidor: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Marca y matrícula son obligatorias"))]
    pub marca: String,

    #[serde(default)]
    pub modelo: String,

    /// Categoría: "Moto 3R", "Moto 4R", "Furgoneta", "Coche", "Otro"
    #[serde(default)]
    pub tipo: String,

    #[serde(default)]
    pub propiedad: OwnershipType,

    #[serde(default)]
    #[validate(range(min = 1950, max = 2100))]
    pub anio: Option<i32>,

    /// "Operativo" / "Taller"
    #[serde(default)]
    pub estado: Option<String>,

    #[serde(default)]
    pub empresa_renting: String,
    #[serde(default)]
    pub contacto_renting: String,
    #[serde(default)]
    pub tel_renting: String,
    #[serde(default)]
    pub email_renting: String,
    #[serde(default)]
    pub fecha_ini_renting: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin_renting: Option<NaiveDate>,
    #[serde(default)]
    pub cuota_renting: Option<Decimal>,

    #[serde(default)]
    pub fecha_itv_ultima: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_itv_proxima: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_seguro: Option<NaiveDate>,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empleado_asignado: Option<i64>,

    #[serde(default)]
    pub asignaciones: Vec<VehicleAssignment>,

    #[serde(default)]
    pub averias: Vec<Breakdown>,

    #[serde(default)]
    pub documentos: Vec<Attachment>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    pub fn in_workshop(&self) -> bool {
        self.estado.as_deref() == Some("Taller")
    }

    /// Caducada si ya pasó; próxima si faltan menos de `ITV_WARNING_DAYS`
    pub fn itv_status(&self, today: NaiveDate) -> Option<ItvStatus> {
        let next = self.fecha_itv_proxima?;
        let days = (next - today).num_days();
        if days < 0 {
            Some(ItvStatus::Caducada)
        } else if days < ITV_WARNING_DAYS {
            Some(ItvStatus::Proxima(days))
        } else {
            None
        }
    }
}

impl Entity for Vehicle {
    const KIND: EntityKind = EntityKind::Vehiculo;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn normalize(&mut self) {
        self.matricula = self.matricula.trim().to_uppercase();
        self.marca = self.marca.trim().to_string();
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        self.empleado_asignado
            .map(|id| vec![(EntityKind::Empleado, id)])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicle(itv: Option<&str>) -> Vehicle {
        serde_json::from_value(json!({
            "id": 7,
            "marca": "Yamaha",
            "matricula": "1234bcd",
            "fecha_itv_proxima": itv,
        }))
        .unwrap()
    }

    #[test]
    fn test_itv_status() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(vehicle(Some("2025-05-31")).itv_status(today), Some(ItvStatus::Caducada));
        assert_eq!(vehicle(Some("2025-06-11")).itv_status(today), Some(ItvStatus::Proxima(10)));
        assert_eq!(vehicle(Some("2025-09-01")).itv_status(today), None);
        assert_eq!(vehicle(None).itv_status(today), None);
    }

    #[test]
    fn test_normalize_uppercases_plate() {
        let mut v = vehicle(None);
        v.normalize();
        assert_eq!(v.matricula, "1234BCD");
        assert!(v.validate().is_ok());
    }

    #[test]
    fn test_ownership_uses_original_labels() {
        let v: Vehicle = serde_json::from_value(json!({
            "marca": "Piaggio", "matricula": "5678FGH", "propiedad": "Renting", "cuota_renting": 120.5
        }))
        .unwrap();
        assert_eq!(v.propiedad, OwnershipType::Renting);
        assert_eq!(serde_json::to_value(OwnershipType::Prode).unwrap(), json!("PRODE"));
    }

    #[test]
    fn test_missing_brand_fails_validation() {
        let v: Vehicle = serde_json::from_value(json!({"matricula": "1234BCD"})).unwrap();
        assert!(v.validate().is_err());
    }
}
