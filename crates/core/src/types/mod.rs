//! Core types for Gala.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::AdminRole;
pub use status::{InvalidTransition, OrderStatus};
