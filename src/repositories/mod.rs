//! Repositorios sobre los stores JSON

pub mod entity_repository;
pub mod trash_repository;

pub use entity_repository::EntityRepository;
pub use trash_repository::{TrashFilter, TrashRepository};

/// Resultado de una operación junto con los avisos de lectura de los stores
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Outcome<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
