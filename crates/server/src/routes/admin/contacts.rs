//! Admin contact-message reads. Role `admin` only — raw contact data
//! includes personal details the editor role has no business reading.

use axum::{Json, extract::State};

use crate::db::contacts::ContactRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::ContactMessage;
use crate::response::ApiResponse;
use crate::state::AppState;

/// All contact messages, newest first.
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ContactMessage>>>> {
    let contacts = ContactRepository::new(state.pool()).list().await?;
    Ok(Json(ApiResponse::ok(contacts)))
}
