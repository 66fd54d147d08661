use std::sync::Arc;

use chrono::Local;

use crate::dto::dashboard_dto::DashboardResponse;
use crate::dto::ApiResponse;
use crate::services::DashboardService;
use crate::storage::DataStore;
use crate::utils::errors::AppError;

pub struct DashboardController {
    service: DashboardService,
}

impl DashboardController {
    pub fn new(data: Arc<DataStore>) -> Self {
        Self {
            service: DashboardService::new(data),
        }
    }

    pub async fn summary(&self) -> Result<ApiResponse<DashboardResponse>, AppError> {
        let today = Local::now().date_naive();
        Ok(self.service.summary(today).await?.into())
    }
}
