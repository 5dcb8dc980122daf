use std::sync::Arc;

use apexskill_backend::api::router;
use apexskill_backend::auth;
use apexskill_backend::db::schema;
use apexskill_backend::services::relay::{CAREER_SHEET, CONTACT_SHEET};
use apexskill_backend::sheets::InMemorySheetsClient;
use apexskill_backend::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

async fn setup() -> (Router, Arc<InMemorySheetsClient>) {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    schema::bootstrap(&pool)
        .await
        .expect("Failed to bootstrap schema");

    let sheets = Arc::new(InMemorySheetsClient::new());
    let state = AppState::new(pool, sheets.clone(), TEST_SECRET);

    auth::ensure_admin(&state.admins, "admin", "secret123")
        .await
        .expect("Failed to provision admin");
    state
        .relay
        .ensure_sheets()
        .await
        .expect("Failed to provision sheets");

    (router(state), sheets)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body should be valid json")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authed(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            None,
            &json!({ "username": "admin", "password": "secret123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["username"], json!("admin"));
    body["data"]["token"]
        .as_str()
        .expect("Login should return a token")
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_course_crud_flow() {
    let (app, _) = setup().await;
    let token = login(&app).await;

    // Create with a numeric-string price.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/courses",
            Some(&token),
            &json!({
                "title": "Rust Basics",
                "description": "An introduction to the Rust language.",
                "price": "99.50"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("visible"));
    assert_eq!(body["data"]["price"], json!(99.5));
    let id = body["data"]["id"].as_i64().expect("Course should have an id");

    // Full-replace update, numeric price this time, hide it.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/courses/{}", id),
            Some(&token),
            &json!({
                "title": "Rust Basics, Revised",
                "description": "An introduction to the Rust language.",
                "price": 149.99,
                "status": "hidden"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], json!("Rust Basics, Revised"));
    assert_eq!(body["data"]["price"], json!(149.99));
    assert_eq!(body["data"]["status"], json!("hidden"));

    // Hidden courses stay out of the public catalog.
    let response = app.clone().oneshot(get("/api/courses")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // The dashboard listing still sees them.
    let response = app
        .clone()
        .oneshot(authed("GET", "/api/courses/all", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Toggle back to visible.
    let response = app
        .clone()
        .oneshot(authed(
            "PATCH",
            &format!("/api/courses/{}/toggle-visibility", id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("visible"));

    let response = app.clone().oneshot(get("/api/courses")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Delete, then the course is gone.
    let response = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/courses/{}", id), &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));

    let response = app
        .clone()
        .oneshot(get(&format!("/api/courses/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let (app, _) = setup().await;

    let body = json!({
        "title": "Rust Basics",
        "description": "An introduction to the Rust language."
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", None, &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", Some("garbage"), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get("/api/courses/all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/courses/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            None,
            &json!({ "username": "admin", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["error"], json!("Unauthorized"));
}

#[tokio::test]
async fn test_login_validation_errors() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            None,
            &json!({ "username": "ab" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().expect("Body should list errors");
    assert!(errors.iter().any(|e| e["field"] == json!("username")));
    assert!(errors.iter().any(|e| e["field"] == json!("password")));
}

#[tokio::test]
async fn test_create_course_validation_rejects_and_stores_nothing() {
    let (app, _) = setup().await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/courses",
            Some(&token),
            &json!({ "title": "ab", "description": "too short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().expect("Body should list errors");
    assert!(errors.iter().any(|e| e["field"] == json!("title")));
    assert!(errors.iter().any(|e| e["field"] == json!("description")));

    let response = app
        .clone()
        .oneshot(authed("GET", "/api/courses/all", &token))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_missing_course_responses() {
    let (app, _) = setup().await;
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/courses/4242"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/courses/4242",
            Some(&token),
            &json!({
                "title": "Ghost Course",
                "description": "An update for a course that is not there."
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(authed(
            "PATCH",
            "/api/courses/4242/toggle-visibility",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete is idempotent: an unknown id still reports success.
    let response = app
        .clone()
        .oneshot(authed("DELETE", "/api/courses/4242", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_contact_form_lands_in_sheet() {
    let (app, sheets) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/forms/contact",
            None,
            &json!({
                "name": "Jane Doe",
                "email": "Jane@Example.com",
                "phone": "+1-555-0100",
                "message": "I would like to know more about your courses."
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));

    let rows = sheets.rows(CONTACT_SHEET);
    assert_eq!(rows.len(), 2);
    let row = &rows[1];
    chrono::DateTime::parse_from_rfc3339(&row[0]).expect("Timestamp should be RFC 3339");
    assert_eq!(row[1], "Jane Doe");
    assert_eq!(row[2], "jane@example.com");
    assert_eq!(row[4], "");
}

#[tokio::test]
async fn test_invalid_contact_form_never_reaches_sheet() {
    let (app, sheets) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/forms/contact",
            None,
            &json!({
                "name": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1-555-0100",
                "message": "too short"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    let errors = body["errors"].as_array().expect("Body should list errors");
    assert!(errors.iter().any(|e| e["field"] == json!("message")));

    // Header row only; the failed submission left no trace.
    assert_eq!(sheets.rows(CONTACT_SHEET).len(), 1);
}

#[tokio::test]
async fn test_career_form_lands_in_sheet() {
    let (app, sheets) = setup().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/forms/career",
            None,
            &json!({
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1-555-0100",
                "position": "Instructor"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rows = sheets.rows(CAREER_SHEET);
    assert_eq!(rows.len(), 2);
    let row = &rows[1];
    assert_eq!(row[1], "Jane Doe");
    assert_eq!(row[4], "Instructor");
    assert_eq!(row[5], "N/A");
    assert_eq!(row[6], "");
}
