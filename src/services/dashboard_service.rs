//! Panel general: indicadores y alertas calculados sobre todos los stores

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::dto::dashboard_dto::{
    AbsentToday, Counter, DashboardResponse, MaintenanceAlert, PendingPpe, VehicleItvAlert,
};
use crate::models::ppe::missing_mandatory;
use crate::models::{Absence, Entity, Employee, Maintenance, PpeDelivery, Service, Vehicle};
use crate::repositories::{EntityRepository, Outcome, TrashRepository};
use crate::storage::DataStore;
use crate::utils::errors::AppResult;

/// Días de margen para las ITV registradas en mantenimiento
pub const ITV_MAINTENANCE_DAYS: i64 = 20;
/// Días de margen para el resto de mantenimientos
pub const MAINTENANCE_ALERT_DAYS: i64 = 15;

pub struct DashboardService {
    data: Arc<DataStore>,
}

impl DashboardService {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self { data }
    }

    pub async fn summary(&self, today: NaiveDate) -> AppResult<Outcome<DashboardResponse>> {
        let mut warnings = Vec::new();

        let empleados = collect(&mut warnings, self.list::<Employee>().await?);
        let servicios = collect(&mut warnings, self.list::<Service>().await?);
        let vehiculos = collect(&mut warnings, self.list::<Vehicle>().await?);
        let ausencias = collect(&mut warnings, self.list::<Absence>().await?);
        let epis = collect(&mut warnings, self.list::<PpeDelivery>().await?);
        let mantenimientos = collect(&mut warnings, self.list::<Maintenance>().await?);
        let papelera = TrashRepository::new(self.data.clone()).count().await?;

        let plate = |vehiculo_id: i64| {
            vehiculos
                .iter()
                .find(|v| v.id == vehiculo_id)
                .map(|v| v.matricula.clone())
        };
        let alert = |m: &Maintenance, dias: i64, proxima: NaiveDate| MaintenanceAlert {
            mantenimiento_id: m.id,
            vehiculo_id: m.vehiculo_id,
            matricula: plate(m.vehiculo_id),
            tipo: m.tipo.clone(),
            proxima,
            dias,
        };

        let mut itv_proximas = Vec::new();
        let mut alertas_mantenimiento = Vec::new();
        for m in &mantenimientos {
            let (Some(proxima), Some(dias)) = (m.proxima, m.days_until_next(today)) else {
                continue;
            };
            if m.is_itv() && dias <= ITV_MAINTENANCE_DAYS {
                itv_proximas.push(alert(m, dias, proxima));
            }
            if dias <= MAINTENANCE_ALERT_DAYS {
                alertas_mantenimiento.push(alert(m, dias, proxima));
            }
        }
        itv_proximas.sort_by_key(|a| a.dias);
        alertas_mantenimiento.sort_by_key(|a| a.dias);

        let vehiculos_itv = vehiculos
            .iter()
            .filter_map(|v| {
                v.itv_status(today).map(|estado| VehicleItvAlert {
                    vehiculo_id: v.id,
                    matricula: v.matricula.clone(),
                    fecha_itv_proxima: v.fecha_itv_proxima,
                    estado,
                })
            })
            .collect();

        let epis_pendientes = empleados
            .iter()
            .filter(|e| e.is_active())
            .filter_map(|e| {
                let faltan = missing_mandatory(e.id, &epis);
                (!faltan.is_empty()).then(|| PendingPpe {
                    empleado_id: e.id,
                    nombre: e.full_name(),
                    faltan,
                })
            })
            .collect();

        let ausentes_hoy = ausencias
            .iter()
            .filter(|a| a.covers(today))
            .map(|a| AbsentToday {
                empleado_id: a.empleado_id,
                nombre: empleados
                    .iter()
                    .find(|e| e.id == a.empleado_id)
                    .map(Employee::full_name),
                motivo: a.motivo.label().to_string(),
                hasta: a.hasta,
            })
            .collect();

        let empleados_activos = empleados.iter().filter(|e| e.is_active()).count();
        let servicios_activos = servicios.iter().filter(|s| s.is_active(today)).count();
        let en_taller = vehiculos.iter().filter(|v| v.in_workshop()).count();

        debug!("📊 Panel calculado para {}", today);

        let summary = DashboardResponse {
            fecha: today,
            empleados: Counter {
                activos: empleados_activos,
                inactivos: empleados.len() - empleados_activos,
            },
            servicios: Counter {
                activos: servicios_activos,
                inactivos: servicios.len() - servicios_activos,
            },
            vehiculos: Counter {
                activos: vehiculos.len() - en_taller,
                inactivos: en_taller,
            },
            itv_proximas,
            alertas_mantenimiento,
            vehiculos_itv,
            epis_pendientes,
            ausentes_hoy,
            papelera,
        };

        Ok(Outcome { value: summary, warnings })
    }

    async fn list<T: Entity>(&self) -> AppResult<Outcome<Vec<T>>> {
        EntityRepository::<T>::new(self.data.clone()).list().await
    }
}

fn collect<T>(warnings: &mut Vec<String>, outcome: Outcome<T>) -> T {
    warnings.extend(outcome.warnings);
    outcome.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, file: &str, value: serde_json::Value) {
        let data = dir.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join(file), value.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_summary_counts_and_alerts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empleados.json", json!([
            {"id": 1, "nombre": "Ana", "apellidos": "Ruiz"},
            {"id": 2, "nombre": "Luis", "apellidos": "Gil", "estado": "baja"}
        ]));
        write(&dir, "vehiculos.json", json!([
            {"id": 7, "marca": "Yamaha", "matricula": "1234BCD", "estado": "Taller", "fecha_itv_proxima": "2025-06-10"},
            {"id": 8, "marca": "Piaggio", "matricula": "5678FGH"}
        ]));
        write(&dir, "mantenimiento.json", json!([
            {"id": 1, "vehiculo_id": 7, "tipo": "ITV", "fecha": "2024-06-18", "proxima": "2025-06-18"},
            {"id": 2, "vehiculo_id": 8, "tipo": "Revisión", "fecha": "2025-01-01", "proxima": "2025-07-30"}
        ]));
        write(&dir, "epis.json", json!([
            {"id": 1, "empleado_id": 1, "tipo": "Camiseta", "entregado": true}
        ]));
        write(&dir, "ausencias.json", json!([
            {"id": 1, "empleado_id": 1, "motivo": "Vacaciones", "desde": "2025-05-30", "hasta": "2025-06-05"}
        ]));

        let data = Arc::new(DataStore::new(StorageConfig::new(dir.path())));
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let summary = DashboardService::new(data).summary(today).await.unwrap().value;

        assert_eq!(summary.empleados, Counter { activos: 1, inactivos: 1 });
        assert_eq!(summary.vehiculos, Counter { activos: 1, inactivos: 1 });
        assert_eq!(summary.itv_proximas.len(), 1);
        assert_eq!(summary.itv_proximas[0].dias, 17);
        assert_eq!(summary.itv_proximas[0].matricula.as_deref(), Some("1234BCD"));
        assert!(summary.alertas_mantenimiento.is_empty());
        assert_eq!(summary.vehiculos_itv.len(), 1);
        assert_eq!(summary.epis_pendientes.len(), 1);
        assert_eq!(summary.epis_pendientes[0].faltan.len(), 3);
        assert_eq!(summary.ausentes_hoy.len(), 1);
        assert_eq!(summary.ausentes_hoy[0].motivo, "Vacaciones");
        assert_eq!(summary.papelera, 0);
    }
}
