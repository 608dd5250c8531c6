//! Router-level tests for paths that are decided before any database access:
//! bearer auth, admin guard, request validation, device header, rate limit,
//! request timeout.

use attendance_server::{AppState, Config, api};
use axum::Router;
use axum::body::Body;
use axum::routing::get;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use shared::models::Role;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

fn test_state(extra: &[(&str, &str)]) -> AppState {
    let mut pairs: Vec<(String, String)> = vec![
        ("DATABASE_URL".into(), "postgres://nobody@127.0.0.1:1/none".into()),
        ("JWT_SECRET".into(), "guard-test-secret-guard-test-secret".into()),
    ];
    pairs.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    let config = Config::from_lookup(move |key| {
        pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();
    AppState::with_pool(&config, pool)
}

fn app(state: &AppState) -> Router {
    api::create_router(state.clone())
}

fn bearer(state: &AppState, role: Role) -> String {
    let token = state
        .jwt
        .generate_access_token(Uuid::new_v4(), "someone@x.io", role)
        .unwrap();
    format!("Bearer {token}")
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn error_fields(body: &serde_json::Value) -> Vec<&str> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect()
}

fn json_post(uri: &str) -> http::request::Builder {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
}

#[tokio::test]
async fn test_missing_bearer_is_unauthenticated() {
    let state = test_state(&[]);
    let req = Request::get("/api/v1/profile").body(Body::empty()).unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], 1001);
    assert_eq!(body["code"], 401);
}

#[tokio::test]
async fn test_garbage_bearer_is_invalid_token() {
    let state = test_state(&[]);
    let req = Request::get("/api/v1/attendance/status")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], 1004);
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let state = test_state(&[]);
    let other = test_state(&[("JWT_SECRET", "a-completely-different-secret-value")]);
    let req = Request::get("/api/v1/profile")
        .header(header::AUTHORIZATION, bearer(&other, Role::Admin))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_employee_cannot_reach_admin_routes() {
    let state = test_state(&[]);
    let token = bearer(&state, Role::Employee);

    for (method, uri) in [
        ("GET", "/api/v1/admin/dashboard"),
        ("GET", "/api/v1/users"),
        ("POST", "/api/v1/departments"),
        ("POST", "/api/v1/departments/assignment"),
        ("DELETE", "/api/v1/departments/00000000-0000-0000-0000-000000000001"),
    ] {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, &token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(app(&state), req).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["error_code"], 2003, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_signup_validation_reports_fields() {
    let state = test_state(&[]);
    let req = json_post("/api/v1/auth/signup")
        .body(Body::from(
            r#"{"email":"not-an-email","password":"short","full_name":""}"#,
        ))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], 2);
    assert_eq!(error_fields(&body), ["email", "full_name", "password"]);
}

#[tokio::test]
async fn test_whitespace_padding_does_not_satisfy_length_rules() {
    let state = test_state(&[]);

    let req = json_post("/api/v1/auth/signup")
        .body(Body::from(
            r#"{"email":"pad@x.io","password":"Passw0rd!","full_name":"   "}"#,
        ))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), ["full_name"]);

    let req = Request::put("/api/v1/profile")
        .header(header::AUTHORIZATION, bearer(&state, Role::Employee))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"full_name":" a "}"#))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), ["full_name"]);

    let req = json_post("/api/v1/departments")
        .header(header::AUTHORIZATION, bearer(&state, Role::Admin))
        .body(Body::from(
            r#"{"name":" ab  ","max_clock_in_time":"09:00:00","max_clock_out_time":"17:00:00"}"#,
        ))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), ["name"]);

    let req = Request::put("/api/v1/departments/00000000-0000-0000-0000-000000000001")
        .header(header::AUTHORIZATION, bearer(&state, Role::Admin))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":" ab  "}"#))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), ["name"]);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let state = test_state(&[]);
    let req = json_post("/api/v1/auth/signin")
        .header("x-device-id", "d1")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], 2);
}

#[tokio::test]
async fn test_signin_requires_device_header() {
    let state = test_state(&[]);
    let req = json_post("/api/v1/auth/signin")
        .body(Body::from(r#"{"email":"a@x.io","password":"Passw0rd!"}"#))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], 1008);
    assert_eq!(body["errors"][0]["field"], "X-Device-ID");
}

#[tokio::test]
async fn test_refresh_requires_device_header() {
    let state = test_state(&[]);
    let req = json_post("/api/v1/auth/refresh")
        .header("x-device-id", "   ")
        .body(Body::from(r#"{"refresh_token":"abc"}"#))
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error_code"], 1008);
}

#[tokio::test]
async fn test_bad_query_and_path_use_error_envelope() {
    let state = test_state(&[]);

    let req = Request::get("/api/v1/users?status=sleeping")
        .header(header::AUTHORIZATION, bearer(&state, Role::Admin))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], 2);

    let req = Request::get("/api/v1/attendance/history")
        .header(header::AUTHORIZATION, bearer(&state, Role::Employee))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::get("/api/v1/departments/not-a-uuid")
        .header(header::AUTHORIZATION, bearer(&state, Role::Employee))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&state), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], 2);
}

#[tokio::test]
async fn test_rate_limit_applies_to_api_surface() {
    let state = test_state(&[("RATE_LIMIT_MAX_REQUESTS", "2")]);
    let app = app(&state);

    for _ in 0..2 {
        let req = Request::get("/api/v1/profile")
            .header("x-forwarded-for", "203.0.113.7")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let req = Request::get("/api/v1/profile")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error_code"], 9);

    // another client is unaffected
    let req = Request::get("/api/v1/profile")
        .header("x-forwarded-for", "198.51.100.1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_request_id_is_set_on_responses() {
    let state = test_state(&[]);
    let req = Request::get("/api/v1/profile").body(Body::empty()).unwrap();
    let resp = app(&state).oneshot(req).await.unwrap();
    let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());

    let req = Request::get("/api/v1/profile")
        .header("x-request-id", "caller-chosen")
        .body(Body::empty())
        .unwrap();
    let resp = app(&state).oneshot(req).await.unwrap();
    assert_eq!(resp.headers()["x-request-id"], "caller-chosen");
}

#[tokio::test(start_paused = true)]
async fn test_slow_request_times_out_with_408() {
    let app = Router::new()
        .route("/slow", get(|| std::future::pending::<&'static str>()))
        .layer(api::timeout_layer(1));
    let req = Request::get("/slow").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let state = test_state(&[]);
    let req = Request::get("/api/v1/nope").body(Body::empty()).unwrap();
    let resp = app(&state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
