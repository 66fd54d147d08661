//! Persistencia en ficheros JSON y documentos adjuntos

pub mod documents;
pub mod json_store;

pub use documents::{DocumentStorage, RemovalReport};
pub use json_store::{DataStore, JsonStore, Loaded, StoreGuard, StoreHealth};
