mod common;

use axum::http::{Method, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health_check_is_public() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["stores"]["papelera.json"], "missing");
}

#[tokio::test]
async fn test_api_requires_bearer_token() {
    let app = TestApp::new();
    let (status, body) = app
        .request(Method::GET, "/api/empleados", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_employee_crud() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/empleados",
            json!({"nombre": " Ana ", "apellidos": "Ruiz", "dni": "12345678z", "puesto": "Repartidor"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nombre"], "Ana");
    assert_eq!(body["data"]["dni"], "12345678Z");

    let (status, body) = app
        .put(
            "/api/empleados/1",
            json!({"nombre": "Ana", "apellidos": "Ruiz López", "carnet": "B"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);

    let (_, body) = app.get("/api/empleados/1").await;
    assert_eq!(body["data"]["apellidos"], "Ruiz López");
    assert_eq!(body["data"]["puesto"], "");
    assert_eq!(body["data"]["carnet"], "B");

    let (status, _) = app
        .put("/api/empleados/9", json!({"nombre": "X", "apellidos": "Y"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_employee_without_surname_is_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/empleados", json!({"nombre": "Ana", "apellidos": ""}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(!app.data_path("empleados.json").exists());
}

#[tokio::test]
async fn test_absence_checks_dates_and_employee() {
    let app = TestApp::new();
    let absence = json!({
        "empleado_id": 1, "motivo": "Permiso", "desde": "2025-03-10", "hasta": "2025-03-12"
    });

    let (status, _) = app.post("/api/ausencias", absence.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.post("/api/empleados", json!({"nombre": "Ana", "apellidos": "Ruiz"}))
        .await;
    let (status, _) = app.post("/api/ausencias", absence).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/api/ausencias",
            json!({"empleado_id": 1, "motivo": "Vacaciones", "desde": "2025-03-10", "hasta": "2025-03-01"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_maintenance_requires_existing_vehicle() {
    let app = TestApp::new();
    let record = json!({"vehiculo_id": 1, "tipo": "ITV", "fecha": "2025-01-10", "coste": 45.5});

    let (status, _) = app.post("/api/mantenimiento", record.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.post("/api/vehiculos", json!({"marca": "Yamaha", "matricula": "1234BCD"}))
        .await;
    let (status, body) = app.post("/api/mantenimiento", record).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["coste"], 45.5);
}

#[tokio::test]
async fn test_vehicle_attachment_is_stored_in_entity_folder() {
    let app = TestApp::new();
    app.post("/api/vehiculos", json!({"marca": "Yamaha", "matricula": "1234BCD"}))
        .await;

    let (status, body) = app
        .post(
            "/api/vehiculos/1/documentos",
            json!({"nombre_archivo": "ficha técnica.pdf", "contenido_base64": STANDARD.encode(b"%PDF")}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["ruta"],
        "data/documents/vehicles/veh_1/ficha_técnica.pdf"
    );
    assert!(app
        .data_path("documents/vehicles/veh_1/ficha_técnica.pdf")
        .exists());

    let (_, body) = app.get("/api/vehiculos/1").await;
    assert_eq!(body["data"]["documentos"][0]["nombre"], "ficha técnica.pdf");

    let (status, _) = app
        .post(
            "/api/vehiculos/5/documentos",
            json!({"nombre_archivo": "a.pdf", "contenido_base64": STANDARD.encode(b"x")}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_upload_creates_record() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/documentacion/subir",
            json!({
                "categoria": "Otros",
                "descripcion": "Normativa interna",
                "nombre_archivo": "normativa.pdf",
                "contenido_base64": STANDARD.encode(b"%PDF")
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["archivo"], "data/documents/Otros/general/normativa.pdf");

    let (_, listed) = app.get("/api/documentacion").await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_dashboard_summarizes_stores() {
    let app = TestApp::new();
    app.post("/api/empleados", json!({"nombre": "Ana", "apellidos": "Ruiz"}))
        .await;
    app.post(
        "/api/vehiculos",
        json!({"marca": "Yamaha", "matricula": "1234BCD", "estado": "Taller"}),
    )
    .await;

    let (status, body) = app.get("/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["empleados"]["activos"], 1);
    assert_eq!(body["data"]["vehiculos"]["inactivos"], 1);
    assert_eq!(body["data"]["epis_pendientes"][0]["faltan"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"]["papelera"], 0);
}
