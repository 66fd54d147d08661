//! Modelos del sistema
//!
//! Cada modelo mapea a los registros de su fichero JSON bajo `data/`.

pub mod absence;
pub mod document;
pub mod employee;
pub mod entity;
pub mod maintenance;
pub mod ppe;
pub mod service;
pub mod session;
pub mod trash;
pub mod vehicle;

pub use absence::Absence;
pub use document::{Attachment, Document};
pub use employee::Employee;
pub use entity::{Entity, EntityKind};
pub use maintenance::Maintenance;
pub use ppe::PpeDelivery;
pub use service::Service;
pub use session::{Role, SessionContext};
pub use trash::TrashEntry;
pub use vehicle::Vehicle;
