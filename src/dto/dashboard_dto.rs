//! DTOs del panel general

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::vehicle::ItvStatus;

#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Counter {
    pub activos: usize,
    pub inactivos: usize,
}

#[derive(Debug, Serialize)]
pub struct MaintenanceAlert {
    pub mantenimiento_id: i64,
    pub vehiculo_id: i64,
    pub matricula: Option<String>,
    pub tipo: String,
    pub proxima: NaiveDate,
    pub dias: i64,
}

#[derive(Debug, Serialize)]
pub struct VehicleItvAlert {
    pub vehiculo_id: i64,
    pub matricula: String,
    pub fecha_itv_proxima: Option<NaiveDate>,
    pub estado: ItvStatus,
}

#[derive(Debug, Serialize)]
pub struct PendingPpe {
    pub empleado_id: i64,
    pub nombre: String,
    pub faltan: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct AbsentToday {
    pub empleado_id: i64,
    pub nombre: Option<String>,
    pub motivo: String,
    pub hasta: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub fecha: NaiveDate,
    pub empleados: Counter,
    pub servicios: Counter,
    /// activos = operativos, inactivos = en taller
    pub vehiculos: Counter,
    pub itv_proximas: Vec<MaintenanceAlert>,
    pub alertas_mantenimiento: Vec<MaintenanceAlert>,
    pub vehiculos_itv: Vec<VehicleItvAlert>,
    pub epis_pendientes: Vec<PendingPpe>,
    pub ausentes_hoy: Vec<AbsentToday>,
    pub papelera: usize,
}
