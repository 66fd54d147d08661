//! Contexto de sesión por petición

use serde::{Deserialize, Serialize};

use crate::utils::errors::{forbidden_error, AppError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
}

/// Identidad autenticada y rol, construida una vez por petición
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub username: String,
    pub role: Role,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self, operation: &str) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(forbidden_error(operation, "admin role required"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_cannot_run_admin_operations() {
        let editor = SessionContext::new("maria", Role::Editor);
        assert!(editor.require_admin("purge trash entry").is_err());
        let admin = SessionContext::new("root", Role::Admin);
        assert!(admin.require_admin("purge trash entry").is_ok());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), serde_json::json!("admin"));
    }
}
