//! Authorization gate for the admin surface.
//!
//! Every admin route declares its minimum role by naming one of the two
//! extractors in its handler signature:
//!
//! - [`RequireAuth`] — any active admin account (minimum role: editor)
//! - [`RequireAdmin`] — role `admin` only
//!
//! Both share one token-resolution path; a failed resolution short-circuits
//! the request with a generic 401 before the handler body runs, and a valid
//! token with an insufficient role yields 403.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn update_order(
//!     RequireAuth(admin): RequireAuth,
//!     State(state): State<AppState>,
//! ) -> Result<Json<...>> {
//!     tracing::info!(admin = %admin.email, "status change");
//!     // ...
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

use gala_core::AdminRole;

use crate::error::ApiError;
use crate::models::CurrentAdmin;
use crate::services::AuthService;
use crate::state::AppState;

/// Extract the opaque bearer token from an `Authorization` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Shared gate: resolve the request's bearer token to an admin identity.
async fn authenticate(parts: &Parts, state: &AppState) -> Result<CurrentAdmin, ApiError> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let admin = AuthService::new(state.pool()).authenticate(token).await?;
    Ok(admin)
}

/// Extractor that requires any authenticated admin (minimum role: editor).
pub struct RequireAuth(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authenticate(parts, state).await?;
        Ok(Self(admin))
    }
}

/// Extractor that requires the `admin` role.
///
/// A valid token held by an editor is rejected with 403, not 401 — the
/// client should not purge its credentials over a role mismatch.
pub struct RequireAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authenticate(parts, state).await?;

        if !admin.role.meets(AdminRole::Admin) {
            return Err(ApiError::Forbidden);
        }

        Ok(Self(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic abc123"),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
