//! Estado compartido de la aplicación
//!
//! Se pasa a través del router de Axum a todos los handlers.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::storage::DataStore;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub data: Arc<DataStore>,
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        let data = Arc::new(DataStore::new(config.storage()));
        let jwt = JwtConfig::from(&config);
        Self { config, data, jwt }
    }
}
