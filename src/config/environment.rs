//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use super::storage::StorageConfig;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub base_dir: PathBuf,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno (tras `dotenvy`)
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            base_dir: env::var("BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            cors_origins: parse_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rutas de los ficheros de datos bajo `BASE_DIR`
    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(self.base_dir.clone())
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_skips_blanks() {
        assert_eq!(
            parse_origins("http://localhost:5173, ,https://prode.es"),
            vec!["http://localhost:5173", "https://prode.es"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig {
            environment: "development".to_string(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            base_dir: PathBuf::from("."),
            jwt_secret: "x".to_string(),
            cors_origins: vec![],
        };
        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert!(config.is_development());
    }
}
