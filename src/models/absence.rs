//! Modelo de Ausencia (vacaciones / permisos / bajas)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::entity::{deserialize_id, Entity, EntityKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AbsenceReason {
    Vacaciones,
    Permiso,
    #[serde(rename = "Baja médica")]
    BajaMedica,
}

impl AbsenceReason {
    pub fn label(&self) -> &'static str {
        match self {
            AbsenceReason::Vacaciones => "Vacaciones",
            AbsenceReason::Permiso => "Permiso",
            AbsenceReason::BajaMedica => "Baja médica",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_absence_range"))]
pub struct Absence {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: i64,

    #[serde(deserialize_with = "deserialize_id")]
    pub empleado_id: i64,

    pub motivo: AbsenceReason,

    pub desde: NaiveDate,

    pub hasta: NaiveDate,

    /// Ruta relativa del justificante
    #[serde(default)]
    pub justificante: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Absence {
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.desde <= day && day <= self.hasta
    }
}

fn validate_absence_range(absence: &Absence) -> Result<(), ValidationError> {
    if absence.hasta < absence.desde {
        let mut error = ValidationError::new("date_range");
        error.message = Some("La fecha FIN no puede ser menor que la fecha INICIO".into());
        return Err(error);
    }
    Ok(())
}

impl Entity for Absence {
    const KIND: EntityKind = EntityKind::Ausencia;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn references(&self) -> Vec<(EntityKind, i64)> {
        vec![(EntityKind::Empleado, self.empleado_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn absence(desde: &str, hasta: &str) -> Absence {
        serde_json::from_value(json!({
            "empleado_id": 1,
            "motivo": "Baja médica",
            "desde": desde,
            "hasta": hasta
        }))
        .unwrap()
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        assert!(absence("2025-03-10", "2025-03-01").validate().is_err());
        assert!(absence("2025-03-01", "2025-03-01").validate().is_ok());
    }

    #[test]
    fn test_covers_is_inclusive() {
        let a = absence("2025-03-01", "2025-03-05");
        assert!(a.covers(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()));
        assert!(!a.covers(NaiveDate::from_ymd_opt(2025, 3, 6).unwrap()));
        assert_eq!(a.motivo, AbsenceReason::BajaMedica);
    }
}
