//! Router-level authentication tests.
//!
//! These use a lazily-connected pool, so no database is required: every
//! request here is decided by the middleware or the router before a handler
//! touches storage.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use contaerp_api::app::{AppServices, AppState, build_app};
use contaerp_auth::{Hs256JwtIssuer, Hs256JwtValidator, JwtClaims, PrincipalId, Role};
use contaerp_core::TenantId;
use contaerp_store::{Database, DatabaseConfig};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let config = DatabaseConfig {
        host: "localhost".into(),
        port: 5432,
        user: "postgres".into(),
        password: String::new(),
        database: "contaerp_test".into(),
        max_connections: 1,
    };
    let db = Database::connect_lazy(&config).unwrap();
    build_app(AppState {
        services: AppServices::new(db),
        validator: Arc::new(Hs256JwtValidator::new(SECRET.as_bytes().to_vec())),
        issuer: Arc::new(Hs256JwtIssuer::new(SECRET.as_bytes())),
    })
}

fn mint_token(secret: &str) -> String {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: PrincipalId::new(),
        tenant_id: TenantId::new(),
        roles: vec![Role::admin()],
        issued_at: now - Duration::minutes(1),
        expires_at: now + Duration::minutes(30),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/companies")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/companies")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_with_wrong_secret_is_rejected() {
    let app = test_app();
    let token = mint_token("another-secret");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/companies")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_is_reachable_without_a_token() {
    let app = test_app();
    // GET is not registered on /auth/login: a 405 (rather than 401) proves
    // the route sits outside the auth layer.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn valid_token_reaches_the_router() {
    let app = test_app();
    let token = mint_token(SECRET);
    // PATCH is not registered on /companies: a 405 (rather than 401) proves
    // the middleware let the request through to the route.
    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/companies")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
