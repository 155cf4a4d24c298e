//! Business services sitting between the route handlers and the
//! repositories.

pub mod auth;
pub mod orders;

pub use auth::{AuthError, AuthService, LoginOutcome};
pub use orders::{OrderService, PlaceOrderRequest, PlacedOrder};
