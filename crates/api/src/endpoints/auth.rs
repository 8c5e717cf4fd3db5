//! Authentication endpoints.
//!
//! Tokens are issued as HttpOnly cookies plus a readable CSRF cookie; clients
//! echo the CSRF value in `X-CSRF-Token` on state-changing requests.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gatherly_common::{
    AppError, AppResult,
    auth::{TokenKind, decode_token, encode_token, generate_csrf_token},
};
use gatherly_core::{LoginInput, RegisterInput, UserResponse};
use serde::Serialize;

use crate::{
    middleware::{ACCESS_COOKIE, AppState, CSRF_COOKIE, REFRESH_COOKIE},
    response::ApiResponse,
};

/// Authentication response: the caller plus the CSRF token to echo back.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub csrf_token: String,
}

/// Register a new account and sign the caller in.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, CookieJar, Json<ApiResponse<AuthResponse>>)> {
    let user = state.user_service.register(input).await?;
    let (jar, csrf_token) = issue_session(&state, jar, user.id)?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::ok(AuthResponse {
            user: user.into(),
            csrf_token,
        })),
    ))
}

/// Sign in to an existing account.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(input): Json<LoginInput>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthResponse>>)> {
    let user = state.user_service.authenticate(input).await?;
    let (jar, csrf_token) = issue_session(&state, jar, user.id)?;

    Ok((
        jar,
        Json(ApiResponse::ok(AuthResponse {
            user: user.into(),
            csrf_token,
        })),
    ))
}

/// Sign out by clearing the session cookies.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar
        .remove(Cookie::from(ACCESS_COOKIE))
        .remove(Cookie::from(REFRESH_COOKIE))
        .remove(Cookie::from(CSRF_COOKIE));

    (jar, StatusCode::NO_CONTENT)
}

/// Exchange the refresh cookie for a fresh access token.
async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthResponse>>)> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let claims = decode_token(
        &refresh_token,
        TokenKind::Refresh,
        &state.config.auth.jwt_secret,
    )?;
    let user = state.user_service.get_by_id(claims.sub).await?;

    let (jar, csrf_token) = issue_session(&state, jar, user.id)?;

    Ok((
        jar,
        Json(ApiResponse::ok(AuthResponse {
            user: user.into(),
            csrf_token,
        })),
    ))
}

/// Issue access, refresh, and CSRF cookies for a user.
fn issue_session(
    state: &AppState,
    jar: CookieJar,
    user_id: i32,
) -> AppResult<(CookieJar, String)> {
    let auth = &state.config.auth;

    let access = encode_token(user_id, TokenKind::Access, auth.access_ttl_secs, &auth.jwt_secret)?;
    let refresh = encode_token(
        user_id,
        TokenKind::Refresh,
        auth.refresh_ttl_secs,
        &auth.jwt_secret,
    )?;
    let csrf_token = generate_csrf_token();

    let jar = jar
        .add(session_cookie(ACCESS_COOKIE, access, true, auth.cookie_secure))
        .add(session_cookie(REFRESH_COOKIE, refresh, true, auth.cookie_secure))
        .add(session_cookie(
            CSRF_COOKIE,
            csrf_token.clone(),
            false,
            auth.cookie_secure,
        ));

    Ok((jar, csrf_token))
}

fn session_cookie(
    name: &'static str,
    value: String,
    http_only: bool,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
}
