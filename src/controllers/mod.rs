pub mod dashboard_controller;
pub mod document_controller;
pub mod entity_controller;
pub mod trash_controller;
