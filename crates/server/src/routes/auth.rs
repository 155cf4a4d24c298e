//! Handshake, login, logout and identity routes.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::auth::{RequireAuth, bearer_token};
use crate::middleware::csrf;
use crate::models::CurrentAdmin;
use crate::response::ApiResponse;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Device label recorded when the client does not send one.
const DEFAULT_DEVICE_NAME: &str = "web-admin";

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/csrf-cookie", get(csrf_cookie))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(user))
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub device_name: Option<String>,
}

/// Successful login response: identity projection plus the bearer token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: CurrentAdmin,
    pub token: String,
}

/// Begin the anti-forgery handshake.
///
/// Sets the signed handshake cookie the frontend must echo back in the
/// `X-CSRF-Token` header on the login call. Idempotent; each call mints a
/// fresh value.
async fn csrf_cookie(State(state): State<AppState>) -> impl IntoResponse {
    let token = csrf::mint(&state.config().app_secret, Utc::now().timestamp());
    let cookie = csrf::set_cookie_value(&token, state.config().is_secure());

    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

/// Exchange credentials for a bearer token.
///
/// Requires a valid, unexpired handshake proof from a prior
/// `GET /auth/csrf-cookie`. Every failure mode — bad handshake, unknown
/// email, wrong password, inactive account — surfaces as the same
/// generic 401.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(form): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let config = state.config();
    if let Err(reason) = csrf::verify_request(&headers, &config.app_secret, Utc::now().timestamp())
    {
        tracing::warn!(%reason, "login rejected: handshake failed");
        return Err(AuthError::InvalidHandshake.into());
    }

    let device_name = form.device_name.as_deref().unwrap_or(DEFAULT_DEVICE_NAME);
    let outcome = AuthService::new(state.pool())
        .login(&form.email, &form.password, device_name)
        .await?;

    tracing::info!(admin = %outcome.user.email, "admin logged in");

    Ok(Json(LoginResponse {
        user: outcome.user,
        token: outcome.token,
    }))
}

/// Revoke the caller's bearer token.
///
/// Always reports success: revoking an already-dead token is a no-op, and
/// internal revocation failures are logged rather than surfaced.
async fn logout(
    State(state): State<AppState>,
    RequireAuth(admin): RequireAuth,
    headers: HeaderMap,
) -> Json<ApiResponse<()>> {
    // RequireAuth already saw a bearer token, so this always runs.
    if let Some(token) = bearer_token(&headers) {
        match AuthService::new(state.pool()).logout(token).await {
            Ok(()) => tracing::info!(admin = %admin.email, "admin logged out"),
            Err(e) => {
                tracing::error!(error = %e, admin = %admin.email, "token revocation failed");
            }
        }
    }

    Json(ApiResponse::message_only("logged out"))
}

/// Current identity behind the presented bearer token.
async fn user(RequireAuth(admin): RequireAuth) -> Json<CurrentAdmin> {
    Json(admin)
}
