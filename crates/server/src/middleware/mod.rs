//! Request-level plumbing: the authorization gate and the anti-forgery
//! handshake.

pub mod auth;
pub mod csrf;

pub use auth::{RequireAdmin, RequireAuth, bearer_token};
