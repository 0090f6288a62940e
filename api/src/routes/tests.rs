use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::build_router;
use crate::testing::demo_state;

fn server() -> TestServer {
    TestServer::new(build_router(demo_state())).unwrap()
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

async fn login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn submit_cleaning_report(server: &TestServer) -> i64 {
    let response = server
        .post("/api/v1/areas/3/submissions")
        .json(&json!({
            "dni": "12345678",
            "codigo": "U20201234",
            "pabellon_id": 1,
            "salon_id": 101,
            "form_data": { "descripcion": "Papeles en el pasillo" }
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["form_data"]["salon_nombre"], "A-101");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_and_docs() {
    let server = server();
    let health: Value = server.get("/health").await.json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["store"], "memory");

    let doc: Value = server.get("/api-docs/openapi.json").await.json();
    assert!(doc["paths"]["/api/v1/reports/{id}/status"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
}

#[tokio::test]
async fn test_public_catalog() {
    let server = server();
    let areas: Value = server.get("/api/v1/areas").await.json();
    assert_eq!(areas["data"].as_array().unwrap().len(), 3);

    let form: Value = server.get("/api/v1/areas/1/form").await.json();
    let fields = form["data"]["fields"].as_array().unwrap();
    assert_eq!(fields[0]["name"], "tipo_incidencia");

    let salones: Value = server.get("/api/v1/pabellones/1/salones").await.json();
    assert_eq!(salones["data"].as_array().unwrap().len(), 2);

    server.get("/api/v1/areas/99").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_student() {
    let server = server();
    let found: Value = server
        .post("/api/v1/students/verify")
        .json(&json!({ "dni": "12345678", "codigo": "U20201234" }))
        .await
        .json();
    assert_eq!(found["data"]["nombre"], "Ana Torres");

    let response = server
        .post("/api/v1/students/verify")
        .json(&json!({ "dni": "12345678", "codigo": "U20195678" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_incomplete_report_is_rejected() {
    let server = server();
    let response = server
        .post("/api/v1/areas/3/submissions")
        .json(&json!({ "dni": "12345678", "codigo": "U20201234", "form_data": { "descripcion": "x" } }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "missing_location");
}

#[tokio::test]
async fn test_reports_need_a_session() {
    let server = server();
    server.get("/api/v1/reports").await.assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/v1/reports")
        .add_header(header::AUTHORIZATION, bearer("not-a-token"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_lifecycle() {
    let server = server();
    let id = submit_cleaning_report(&server).await;
    let token = login(&server, "admin", "admin123").await;

    let list: Value = server
        .get("/api/v1/reports")
        .add_query_param("status", "pending")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(list["data"]["total"], 1);

    let updated: Value = server
        .put(&format!("/api/v1/reports/{id}/status"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "in_progress", "estimated_time": "2 horas" }))
        .await
        .json();
    assert_eq!(updated["data"]["status"], "in_progress");
    assert_eq!(updated["data"]["estimated_time"], "2 horas");

    let resolved: Value = server
        .put(&format!("/api/v1/reports/{id}/status"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "resolved" }))
        .await
        .json();
    assert_eq!(resolved["data"]["status"], "resolved");
    assert!(resolved["data"]["estimated_time"].is_null());

    let response = server
        .put(&format!("/api/v1/reports/{id}/status"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "status": "archived" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_area_operator_scope() {
    let server = server();
    let id = submit_cleaning_report(&server).await;
    let token = login(&server, "mantenimiento", "mant123").await;

    let list: Value = server
        .get("/api/v1/reports")
        .add_query_param("area_id", 3)
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(list["data"]["total"], 0);

    server
        .get(&format!("/api/v1/reports/{id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .post("/api/v1/admin/areas")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "nombre": "Seguridad" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let dashboard: Value = server
        .get("/api/v1/dashboard")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(dashboard["data"]["role"], "area");
    assert_eq!(dashboard["data"]["area"]["id"], 1);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let server = server();
    let token = login(&server, "ti", "ti123").await;
    let me: Value = server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(me["data"]["area_id"], 2);

    server
        .post("/api/v1/auth/logout")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status_ok();
    server
        .get("/api/v1/auth/me")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .post("/api/v1/auth/login")
        .json(&json!({ "username": "ti", "password": "wrong" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_field_file() {
    let server = server();
    let response = server
        .post("/api/v1/uploads")
        .add_query_param("area_id", 1)
        .add_query_param("field", "foto")
        .add_query_param("filename", "grieta.png")
        .content_type("image/png")
        .bytes(vec![0x89, 0x50, 0x4e, 0x47].into())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["size"], 4);
    assert!(body["data"]["url"].as_str().unwrap().ends_with("-grieta.png"));

    server
        .post("/api/v1/uploads")
        .add_query_param("area_id", 1)
        .add_query_param("field", "foto")
        .add_query_param("filename", "notas.txt")
        .content_type("text/plain")
        .bytes(b"hola".to_vec().into())
        .await
        .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_admin_manages_areas() {
    let server = server();
    let token = login(&server, "admin", "admin123").await;

    let created = server
        .post("/api/v1/admin/areas")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({ "nombre": "Seguridad" }))
        .await;
    created.assert_status(StatusCode::CREATED);
    let area_id = created.json::<Value>()["data"]["id"].as_i64().unwrap();

    server
        .post(&format!("/api/v1/admin/areas/{area_id}/fields"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .json(&json!({
            "field_name": "detalle",
            "field_type": "textarea",
            "field_label": "Detalle",
            "is_required": true
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let form: Value = server.get(&format!("/api/v1/areas/{area_id}/form")).await.json();
    assert_eq!(form["data"]["fields"].as_array().unwrap().len(), 1);

    let image: Value = server
        .put(&format!("/api/v1/admin/areas/{area_id}/image"))
        .add_query_param("filename", "logo.png")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .content_type("image/png")
        .bytes(vec![1, 2, 3].into())
        .await
        .json();
    assert!(image["data"]["image_url"].as_str().unwrap().ends_with("-logo.png"));

    let deleted: Value = server
        .delete(&format!("/api/v1/admin/areas/{area_id}"))
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(deleted["data"]["deleted"], 1);
}

#[tokio::test]
async fn test_notification_permission() {
    let server = server();
    let token = login(&server, "admin", "admin123").await;
    let status: Value = server
        .post("/api/v1/notifications/request")
        .add_header(header::AUTHORIZATION, bearer(&token))
        .await
        .json();
    assert_eq!(status["data"]["permission"], "granted");
    assert_eq!(status["data"]["supported"], true);
}
