//! Domain models for the Gala API.
//!
//! These are validated domain objects; the raw database rows live with
//! their repositories under [`crate::db`].

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod order;
pub mod product;

pub use admin::{AdminUser, CurrentAdmin};
pub use catalog::{PortfolioItem, Service};
pub use contact::ContactMessage;
pub use order::{Order, OrderLineItem, OrderWithItems};
pub use product::{Product, ProductDraft};
