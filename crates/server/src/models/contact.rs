//! Contact-message domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gala_core::{ContactId, Email};

/// A message left through the public contact form.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: ContactId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
