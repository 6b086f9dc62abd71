//! HttpClient against a local axum server speaking the console wire contract

use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use gatekeeper_client::{ApiClient, ApiError, HttpClient, HttpClientConfig, decode_data};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
struct LoginForm {
    email_or_phone: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Result<Json<Value>, StatusCode> {
    if form.email_or_phone == "a@b.com" && form.password == "x" {
        Ok(Json(json!({ "data": { "token": "T1" } })))
    } else {
        Err(StatusCode::UNPROCESSABLE_ENTITY)
    }
}

async fn me(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();

    if auth != "Bearer T1" {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(Json(json!({
        "data": {
            "id": 7,
            "email": "a@b.com",
            "roles": [{ "name": "System Admin" }]
        }
    })))
}

async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn spawn_server() -> HttpClient {
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/me", get(me))
        .route("/api/logout", delete(logout))
        .route("/api/broken", get(broken));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpClient::new(HttpClientConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    token: String,
}

#[tokio::test]
async fn test_login_sends_form_fields() {
    let client = spawn_server().await;

    let body = client
        .post_form("/api/login", &[("email_or_phone", "a@b.com"), ("password", "x")], None)
        .await
        .unwrap();

    let payload: TokenPayload = decode_data(body).unwrap();
    assert_eq!(payload.token, "T1");
}

#[tokio::test]
async fn test_login_rejected_maps_to_status_error() {
    let client = spawn_server().await;

    let result = client
        .post_form("/api/login", &[("email_or_phone", "a@b.com"), ("password", "wrong")], None)
        .await;

    match result {
        Err(ApiError::Status { status, .. }) => assert_eq!(status, 422),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_attaches_bearer_token() {
    let client = spawn_server().await;

    let body = client.get("/api/me", Some("T1")).await.unwrap();
    assert_eq!(body["data"]["roles"][0]["name"], "System Admin");
}

#[tokio::test]
async fn test_get_without_token_is_unauthorized() {
    let client = spawn_server().await;

    let result = client.get("/api/me", None).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    let result = client.get("/api/me", Some("stale")).await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_delete_with_empty_body_returns_null() {
    let client = spawn_server().await;

    let body = client.delete("/api/logout", Some("T1")).await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let client = spawn_server().await;

    match client.get("/api/broken", None).await {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_is_http_error() {
    // Bind then drop a listener to get a port nothing is listening on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(HttpClientConfig {
        base_url: format!("http://{}", addr),
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap();

    let result = client.get("/api/me", Some("T1")).await;
    assert!(matches!(result, Err(ApiError::Http(_))));
}
