use std::collections::HashMap;

use api::{build_router, AppState};
use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shared::Config;
use tower::ServiceExt;

fn config(pairs: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.entry("PASSWORD_HASH_ROUNDS".to_string())
        .or_insert_with(|| "1000".to_string());
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn app() -> Router {
    build_router(AppState::in_memory(config(&[])))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value, HeaderMap) {
    send_with_host(app, method, uri, body, "localhost:8000").await
}

async fn send_with_host(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    host: &str,
) -> (StatusCode, Value, HeaderMap) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, host)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json, headers)
}

fn jane() -> Value {
    json!({
        "email": "Jane@Example.com",
        "username": "jane",
        "first_name": "Jane",
        "last_name": "Doe",
        "password": "s3cret-pass"
    })
}

/// Register Jane and give her a portfolio with 5000 cash; returns (user_id, portfolio_id)
async fn seed(app: &Router) -> (i64, i64) {
    let (status, user, _) = send(app, Method::POST, "/api/v1/users", Some(jane())).await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_i64().unwrap();

    let (status, portfolio, _) = send(
        app,
        Method::POST,
        "/api/v1/portfolios",
        Some(json!({ "user_id": user_id, "name": "Core", "cash_balance": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (user_id, portfolio["id"].as_i64().unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body, headers) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "fingenius-api");
    assert!(body["timestamp"].as_f64().unwrap() > 0.0);
    assert!(headers.contains_key("x-process-time"));
}

#[tokio::test]
async fn test_version_reports_build_info() {
    let app = app();
    let (status, body, _) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["git_hash"].is_string());
    assert!(body["build_time"].is_string());
}

#[tokio::test]
async fn test_user_registration_and_login() {
    let app = app();
    let (status, user, _) = send(&app, Method::POST, "/api/v1/users", Some(jane())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "jane@example.com");
    assert_eq!(user["full_name"], "Jane Doe");
    assert_eq!(user["kyc_status"], "pending");
    assert!(user["last_login"].is_null());
    assert!(user.get("hashed_password").is_none());

    let (status, body, _) = send(&app, Method::POST, "/api/v1/users", Some(jane())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["detail"].is_string());

    let login = json!({ "email": "jane@example.com", "password": "s3cret-pass" });
    let (status, body, _) = send(&app, Method::POST, "/api/v1/auth/login", Some(login.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["last_login"].is_string());

    let wrong = json!({ "email": "jane@example.com", "password": "nope-nope" });
    let (status, _, _) = send(&app, Method::POST, "/api/v1/auth/login", Some(wrong)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let id = user["id"].as_i64().unwrap();
    let (status, body, _) = send(&app, Method::DELETE, &format!("/api/v1/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (status, _, _) = send(&app, Method::POST, "/api/v1/auth/login", Some(login)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_records_are_404() {
    let app = app();
    let (status, body, _) = send(&app, Method::GET, "/api/v1/users/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "user 42 not found");

    let (status, _, _) = send(&app, Method::GET, "/api/v1/portfolios/7/valuation", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, Method::DELETE, "/api/v1/holdings/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_portfolio_valuation_flow() {
    let app = app();
    let (user_id, portfolio_id) = seed(&app).await;

    let (status, holding, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/portfolios/{}/holdings", portfolio_id),
        Some(json!({
            "symbol": "AAPL",
            "security_name": "Apple Inc.",
            "security_type": "stock",
            "quantity": 10,
            "average_cost": 100,
            "current_price": 150,
            "sector": "technology"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(holding["current_value"].as_f64(), Some(1500.0));
    assert_eq!(holding["unrealized_gain_loss"].as_f64(), Some(500.0));
    assert_eq!(holding["unrealized_gain_loss_percent"].as_f64(), Some(50.0));
    let holding_id = holding["id"].as_i64().unwrap();

    let (_, valuation, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/valuation", portfolio_id),
        None,
    )
    .await;
    assert_eq!(valuation["total_value"].as_f64(), Some(6500.0));
    assert_eq!(valuation["stored_total_value"].as_f64(), Some(0.0));

    let (_, allocation, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/allocation/stocks", portfolio_id),
        None,
    )
    .await;
    assert_eq!(allocation["percentage"].as_f64(), Some(0.0));

    let (status, breakdown, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/breakdown/sector", portfolio_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(breakdown["allocation"]["technology"].is_number());
    assert!(breakdown["allocation"]["cash"].is_number());

    let (status, snapshot, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/portfolios/{}/snapshot", portfolio_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["total_value"].as_f64(), Some(6500.0));

    let (_, portfolio, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}", portfolio_id),
        None,
    )
    .await;
    assert_eq!(portfolio["total_value"].as_f64(), Some(6500.0));
    assert!(portfolio["last_updated"].is_string());

    let (status, repriced, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/holdings/{}/price", holding_id),
        Some(json!({ "price": 200 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(repriced["current_value"].as_f64(), Some(2000.0));

    let (_, valuation, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/valuation", portfolio_id),
        None,
    )
    .await;
    assert_eq!(valuation["total_value"].as_f64(), Some(7000.0));
    assert_eq!(valuation["drift"].as_f64(), Some(500.0));

    let (_, listed, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/users/{}/portfolios", user_id),
        None,
    )
    .await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let (status, _, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/holdings/{}", holding_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, holdings, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/holdings", portfolio_id),
        None,
    )
    .await;
    assert_eq!(holdings, json!([]));
}

#[tokio::test]
async fn test_business_rule_violations_are_422() {
    let app = app();
    let (user_id, portfolio_id) = seed(&app).await;

    let (status, body, _) = send(
        &app,
        Method::POST,
        "/api/v1/portfolios",
        Some(json!({ "user_id": user_id, "name": "Overdrawn", "cash_balance": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("negative cash"));

    let (status, _, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/breakdown/planet", portfolio_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, holding, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/portfolios/{}/holdings", portfolio_id),
        Some(json!({
            "symbol": "BND",
            "security_type": "bond",
            "quantity": 5,
            "average_cost": 80
        })),
    )
    .await;
    let (status, _, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/holdings/{}/price", holding["id"].as_i64().unwrap()),
        Some(json!({ "price": -3 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_out_of_range_amounts_are_422() {
    let app = app();
    let (user_id, portfolio_id) = seed(&app).await;

    let (status, body, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/portfolios/{}/holdings", portfolio_id),
        Some(json!({
            "symbol": "HUGE",
            "security_type": "stock",
            "quantity": "1000000000000000",
            "average_cost": "1",
            "current_price": "1000000000000000"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, tiny, _) = send(
        &app,
        Method::POST,
        "/api/v1/portfolios",
        Some(json!({
            "user_id": user_id,
            "name": "Tiny",
            "cash_balance": "0.0001",
            "asset_allocation": { "stocks": "1000000000000000000000000000" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(tiny["asset_allocation"]["stocks"].is_number());

    let (status, _, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/portfolios/{}/allocation/stocks", tiny["id"].as_i64().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_untrusted_host_is_rejected() {
    let app = build_router(AppState::in_memory(config(&[(
        "ALLOWED_HOSTS",
        "api.fingenius.com,*.fingenius.io",
    )])));

    let (status, body, _) =
        send_with_host(&app, Method::GET, "/health", None, "evil.example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid host header");

    let (status, _, _) =
        send_with_host(&app, Method::GET, "/health", None, "app.fingenius.io:8000").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) =
        send_with_host(&app, Method::GET, "/health", None, "api.fingenius.com").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/portfolios")
        .header(header::HOST, "localhost:8000")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
