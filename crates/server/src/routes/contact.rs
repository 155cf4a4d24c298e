//! Public contact-form intake.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use gala_core::Email;

use crate::db::contacts::ContactRepository;
use crate::error::{Result, ValidationErrors};
use crate::models::ContactMessage;
use crate::response::ApiResponse;
use crate::state::AppState;

const MAX_PHONE_LENGTH: usize = 50;

/// Body of `POST /contact`.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Store a message from the contact form.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactMessage>>)> {
    let (email, phone) = validate(&request)?;

    let message = ContactRepository::new(state.pool())
        .create(request.name.trim(), &email, phone.as_deref(), request.message.trim())
        .await?;

    tracing::info!(contact_id = %message.id, "contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("message received", message)),
    ))
}

/// Shape validation. Phone is optional; everything else is required.
fn validate(
    request: &ContactRequest,
) -> std::result::Result<(Email, Option<String>), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if request.name.trim().is_empty() {
        errors.add("name", "required");
    }

    let email = match request.email.trim() {
        "" => {
            errors.add("email", "required");
            None
        }
        raw => match Email::parse(raw) {
            Ok(email) => Some(email),
            Err(e) => {
                errors.add("email", e.to_string());
                None
            }
        },
    };

    let phone = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());
    if let Some(phone) = phone
        && phone.len() > MAX_PHONE_LENGTH
    {
        errors.add("phone", format!("must be at most {MAX_PHONE_LENGTH} characters"));
    }

    if request.message.trim().is_empty() {
        errors.add("message", "required");
    }

    errors.into_result()?;

    let Some(email) = email else {
        let mut errors = ValidationErrors::new();
        errors.add("email", "required");
        return Err(errors);
    };

    Ok((email, phone.map(str::to_owned)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name_email_message() {
        let errors = validate(&ContactRequest::default()).unwrap_err();
        assert!(errors.field("name").is_some());
        assert!(errors.field("email").is_some());
        assert!(errors.field("message").is_some());
        assert!(errors.field("phone").is_none());
    }

    #[test]
    fn test_validate_accepts_missing_phone() {
        let request = ContactRequest {
            name: "Jean".to_string(),
            email: "jean@x.com".to_string(),
            phone: None,
            message: "Devis mariage svp".to_string(),
        };
        let (email, phone) = validate(&request).expect("valid");
        assert_eq!(email.as_str(), "jean@x.com");
        assert!(phone.is_none());
    }

    #[test]
    fn test_validate_blank_phone_becomes_none() {
        let request = ContactRequest {
            name: "Jean".to_string(),
            email: "jean@x.com".to_string(),
            phone: Some("   ".to_string()),
            message: "hello".to_string(),
        };
        let (_, phone) = validate(&request).expect("valid");
        assert!(phone.is_none());
    }
}
