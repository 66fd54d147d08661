//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de almacenamiento, variables de entorno
//! y otras configuraciones del sistema.

pub mod environment;
pub mod storage;

pub use environment::*;
pub use storage::StorageConfig;
