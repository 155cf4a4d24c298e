//! Read-only catalog entries: event services and portfolio items.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gala_core::{PortfolioId, ServiceId};

/// An event service offered by the company (weddings, corporate events, ...).
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub category: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// A past-event portfolio entry.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioItem {
    pub id: PortfolioId,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub category: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}
