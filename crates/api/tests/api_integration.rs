//! API integration tests.
//!
//! These tests drive the full router (middleware included) against a mock
//! database connection.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use gatherly_api::middleware::AppState;
use gatherly_common::{
    auth::{TokenKind, encode_token},
    config::{AuthConfig, Config, DatabaseConfig, ServerConfig},
};
use gatherly_core::{
    CommentService, EventInvitationService, EventService, GroupInvitationService, GroupService,
    RsvpService, UserService,
};
use gatherly_db::entities::{event, user};
use gatherly_db::repositories::{
    CommentRepository, EventInvitationRepository, EventRepository, GroupInvitationRepository,
    GroupRepository, RsvpRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

const JWT_SECRET: &str = "integration-test-secret";

fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5555,
            static_dir: None,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 604_800,
            cookie_secure: false,
        },
    }
}

fn create_app(db: DatabaseConnection) -> Router {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));
    let group_repo = GroupRepository::new(Arc::clone(&db));
    let event_invitation_repo = EventInvitationRepository::new(Arc::clone(&db));
    let group_invitation_repo = GroupInvitationRepository::new(Arc::clone(&db));
    let rsvp_repo = RsvpRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    let state = AppState {
        config: Arc::new(create_test_config()),
        user_service: UserService::new(user_repo.clone()),
        event_service: EventService::new(event_repo.clone()),
        group_service: GroupService::new(group_repo.clone()),
        event_invitation_service: EventInvitationService::new(
            event_invitation_repo.clone(),
            event_repo.clone(),
            user_repo.clone(),
        ),
        group_invitation_service: GroupInvitationService::new(
            group_invitation_repo,
            group_repo,
            user_repo,
        ),
        rsvp_service: RsvpService::new(rsvp_repo, event_repo.clone(), event_invitation_repo),
        comment_service: CommentService::new(comment_repo, event_repo),
    };

    gatherly_api::app(state)
}

fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

fn test_user(id: i32, username: &str, password: &str) -> user::Model {
    user::Model {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(password),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_event(id: i32, owner_id: i32) -> event::Model {
    event::Model {
        id,
        name: "Launch Party".to_string(),
        date: Utc::now().into(),
        location: "Town Hall".to_string(),
        description: "An event".to_string(),
        owner_id,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn access_token(user_id: i32) -> String {
    encode_token(user_id, TokenKind::Access, 3600, JWT_SECRET).unwrap()
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_token_authenticates() {
    let user = test_user(1, "alice", "Passw0rd!");
    let events = vec![test_event(10, 1)];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user]])
        .append_query_results([events])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/events")
                .header(header::AUTHORIZATION, format!("Bearer {}", access_token(1)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let user = test_user(1, "alice", "Passw0rd!");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"alice","password":"Passw0rd!"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();

    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("csrf_token=")));

    // Token cookies are HttpOnly; the CSRF cookie must be readable.
    assert!(
        cookies
            .iter()
            .find(|c| c.starts_with("access_token="))
            .unwrap()
            .contains("HttpOnly")
    );
    assert!(
        !cookies
            .iter()
            .find(|c| c.starts_with("csrf_token="))
            .unwrap()
            .contains("HttpOnly")
    );
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let user = test_user(1, "alice", "Passw0rd!");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user]])
        .into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"alice","password":"WrongPass1"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_auth_without_csrf_header_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header(header::COOKIE, "access_token=whatever; csrf_token=abc")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cookie_auth_with_matching_csrf_header_passes_gate() {
    let user = test_user(1, "alice", "Passw0rd!");
    let event = test_event(10, 1);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[user]])
        .append_query_results([[event]])
        .into_connection();
    let app = create_app(db);

    let token = access_token(1);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header(
                    header::COOKIE,
                    format!("access_token={token}; csrf_token=abc"),
                )
                .header("X-CSRF-Token", "abc")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"name":"Launch Party","date":"2026-09-14T18:30","location":"Town Hall","description":"An event"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_validates_password() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"alice","email":"alice@example.com","password":"weak"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let app = create_app(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
