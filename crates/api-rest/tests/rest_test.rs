use api_rest::{router, AppState};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use registry_core::{CoreConfig, RegistryService};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

fn test_app(temp_dir: &TempDir) -> Router {
    let cfg = Arc::new(CoreConfig::new(temp_dir.path().join("pacientes.json")));
    router(AppState {
        service: RegistryService::new(cfg),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn ana() -> Value {
    json!({
        "full_name": "Ana Silva",
        "national_id": "111.111.111-11",
        "phone": "(11) 91234-5678",
        "birth_date": "17/05/1990",
        "sex": "Feminino"
    })
}

#[tokio::test]
async fn health_reports_alive() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn list_is_empty_before_any_registration() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, "GET", "/patients", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 0);
    assert_eq!(body["patients"], json!([]));
}

#[tokio::test]
async fn register_then_list_and_lookup() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let (status, body) = send(&app, "POST", "/patients", Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["patient"]["national_id"], "111.111.111-11");
    assert_eq!(body["patient"]["birth_date"], "17/05/1990");
    assert_eq!(body["patient"]["sex"], "Feminino");
    assert_eq!(body["patient"]["email"], Value::Null);

    let (status, body) = send(&app, "GET", "/patients", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["patients"][0]["label"], "Ana Silva - 111.111.111-11");

    let (status, body) = send(&app, "GET", "/patients/111.111.111-11", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["patient"]["full_name"], "Ana Silva");
    let email_row = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["label"] == "Email")
        .unwrap();
    assert_eq!(email_row["value"], "Não informado");

    assert!(temp_dir.path().join("pacientes.json").is_file());
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let (status, _) = send(&app, "POST", "/patients", Some(ana())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/patients", Some(ana())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(String::from_utf8(body).unwrap().contains("111.111.111-11"));

    let (_, body) = send(&app, "GET", "/patients", None).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn missing_required_fields_are_a_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let mut req = ana();
    req["phone"] = json!("");
    req["sex"] = json!("");

    let (status, body) = send(&app, "POST", "/patients", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = String::from_utf8(body).unwrap();
    assert!(message.contains("telefone"));
    assert!(message.contains("sexo"));
    assert!(!temp_dir.path().join("pacientes.json").exists());
}

#[tokio::test]
async fn omitted_required_field_is_a_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let mut req = ana();
    req.as_object_mut().unwrap().remove("phone");

    let (status, body) = send(&app, "POST", "/patients", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("telefone"));
    assert!(!temp_dir.path().join("pacientes.json").exists());
}

#[tokio::test]
async fn unparseable_birth_date_is_a_bad_request() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let mut req = ana();
    req["birth_date"] = json!("17-05-1990");

    let (status, _) = send(&app, "POST", "/patients", Some(req)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn labels_table_and_label_lookup() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);
    send(&app, "POST", "/patients", Some(ana())).await;

    let (status, body) = send(&app, "GET", "/patients/labels", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["labels"], json!(["Ana Silva - 111.111.111-11"]));

    let (status, body) = send(&app, "GET", "/patients/table", None).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["columns"][0], "CPF");
    assert_eq!(body["rows"][0][0], "111.111.111-11");

    let (status, body) = send(
        &app,
        "GET",
        "/patients/by-label?label=Ana%20Silva%20-%20111.111.111-11",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["patient"]["national_id"], "111.111.111-11");

    let (status, _) = send(&app, "GET", "/patients/by-label?label=Ningu%C3%A9m", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_patient_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);

    let (status, _) = send(&app, "GET", "/patients/000.000.000-00", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_and_delete_are_not_implemented() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_app(&temp_dir);
    send(&app, "POST", "/patients", Some(ana())).await;

    let (status, _) = send(&app, "PUT", "/patients/111.111.111-11", Some(ana())).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let (status, _) = send(&app, "DELETE", "/patients/111.111.111-11", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

    let (_, body) = send(&app, "GET", "/patients", None).await;
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["total"], 1);
}
