#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ultima_milla_manager::config::EnvironmentConfig;
use ultima_milla_manager::models::Role;
use ultima_milla_manager::utils::jwt::{generate_token, JwtConfig};
use ultima_milla_manager::{create_app, AppState};

pub const TEST_SECRET: &str = "secreto-de-pruebas";

/// Aplicación completa sobre un directorio temporal
pub struct TestApp {
    pub dir: TempDir,
    router: Router,
}

pub fn test_config(base_dir: &Path) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        base_dir: base_dir.to_path_buf(),
        jwt_secret: TEST_SECRET.to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

pub fn token(role: Role) -> String {
    let config = JwtConfig {
        secret: TEST_SECRET.to_string(),
    };
    let username = match role {
        Role::Admin => "admin",
        Role::Editor => "editor",
    };
    generate_token(username, role, 1, &config).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data").join("documents")).unwrap();
        let router = create_app(AppState::new(test_config(dir.path())));
        Self { dir, router }
    }

    pub fn data_path(&self, relative: &str) -> PathBuf {
        self.dir.path().join("data").join(relative)
    }

    pub fn write_store(&self, file: &str, value: &Value) {
        std::fs::write(self.data_path(file), serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    pub fn read_store(&self, file: &str) -> Value {
        serde_json::from_str(&std::fs::read_to_string(self.data_path(file)).unwrap()).unwrap()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        role: Option<Role>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(role) = role {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token(role)));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(Role::Editor), None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(Role::Editor), Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(Role::Editor), Some(body)).await
    }

    pub async fn delete_as(&self, uri: &str, role: Role) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(role), None).await
    }

    pub async fn restore(&self, trash_id: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            &format!("/api/papelera/{}/restaurar", trash_id),
            Some(Role::Editor),
            None,
        )
        .await
    }
}
