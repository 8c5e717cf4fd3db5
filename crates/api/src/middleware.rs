//! API middleware.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use gatherly_common::{
    Config,
    auth::{TokenKind, decode_token},
};
use gatherly_core::{
    CommentService, EventInvitationService, EventService, GroupInvitationService, GroupService,
    RsvpService, UserService,
};

/// Cookie carrying the access token.
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";
/// Readable cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrf_token";
/// Header the client echoes the CSRF cookie into.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_service: UserService,
    pub event_service: EventService,
    pub group_service: GroupService,
    pub event_invitation_service: EventInvitationService,
    pub group_invitation_service: GroupInvitationService,
    pub rsvp_service: RsvpService,
    pub comment_service: CommentService,
}

/// Build the application router with middleware applied.
pub fn app(state: AppState) -> Router {
    crate::endpoints::router()
        .layer(axum::middleware::from_fn(csrf_middleware))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// Authentication middleware.
///
/// Resolves the caller from the access-token cookie or a `Bearer` header and
/// stashes the user model in request extensions. Requests without a valid
/// token pass through unauthenticated; handlers using [`crate::extractors::AuthUser`]
/// reject them.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(&req) {
        if let Ok(claims) = decode_token(
            &token,
            TokenKind::Access,
            &state.config.auth.jwt_secret,
        ) {
            if let Ok(user) = state.user_service.get_by_id(claims.sub).await {
                req.extensions_mut().insert(user);
            }
        }
    }

    next.run(req).await
}

/// CSRF double-submit middleware.
///
/// State-changing requests authenticated via cookies must echo the readable
/// `csrf_token` cookie in the `X-CSRF-Token` header. Bearer-authenticated
/// requests are exempt (no ambient credential to forge).
pub async fn csrf_middleware(req: Request<Body>, next: Next) -> Response {
    if matches!(
        *req.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    ) {
        let jar = CookieJar::from_headers(req.headers());

        if jar.get(ACCESS_COOKIE).is_some() {
            let cookie_token = jar.get(CSRF_COOKIE).map(|c| c.value().to_string());
            let header_token = req
                .headers()
                .get(CSRF_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);

            let matches = match (cookie_token, header_token) {
                (Some(cookie), Some(header)) => cookie == header,
                _ => false,
            };

            if !matches {
                return (StatusCode::FORBIDDEN, "CSRF token mismatch").into_response();
            }
        }
    }

    next.run(req).await
}

/// Pull a token from the access cookie or the `Authorization` header.
fn extract_token(req: &Request<Body>) -> Option<String> {
    let jar = CookieJar::from_headers(req.headers());
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(ToString::to_string)
}
