//! Order lifecycle state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// An order starts `Pending` and is moved by an admin to `Confirmed` or
/// `Cancelled`. The transition table is deliberately narrow; anything
/// outside it requires an explicit override (see
/// [`OrderStatus::transition`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("order cannot move from {from} to {to} without an override")]
pub struct InvalidTransition {
    /// Status the order currently has.
    pub from: OrderStatus,
    /// Status the caller asked for.
    pub to: OrderStatus,
}

impl OrderStatus {
    /// Stable string form, matching the wire and database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether the plain transition table allows `self -> to`.
    ///
    /// Allowed: `pending -> confirmed`, `pending -> cancelled`, and writing
    /// the current status again (idempotent no-op). Terminal states never
    /// move without an override.
    #[must_use]
    pub const fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, _) | (Self::Confirmed, Self::Confirmed) | (Self::Cancelled, Self::Cancelled)
        )
    }

    /// Apply a status change.
    ///
    /// With `override_requested` the transition table is bypassed and any
    /// of the three states may be written, including back to `Pending`.
    /// The admin surface is the only caller, so the override is an explicit
    /// operator action, never a default.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when the table disallows the change
    /// and no override was requested.
    pub const fn transition(
        self,
        to: Self,
        override_requested: bool,
    ) -> Result<Self, InvalidTransition> {
        if override_requested || self.can_transition(to) {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_moves_anywhere() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Confirmed));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Cancelled));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Pending));
    }

    #[test]
    fn test_terminal_states_hold() {
        assert!(!OrderStatus::Confirmed.can_transition(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Confirmed));
        assert!(!OrderStatus::Confirmed.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition(OrderStatus::Pending));
    }

    #[test]
    fn test_same_state_is_idempotent() {
        assert!(OrderStatus::Confirmed.can_transition(OrderStatus::Confirmed));
        assert!(OrderStatus::Cancelled.can_transition(OrderStatus::Cancelled));
    }

    #[test]
    fn test_transition_rejects_without_override() {
        let err = OrderStatus::Confirmed
            .transition(OrderStatus::Cancelled, false)
            .unwrap_err();
        assert_eq!(err.from, OrderStatus::Confirmed);
        assert_eq!(err.to, OrderStatus::Cancelled);
    }

    #[test]
    fn test_override_bypasses_table() {
        assert_eq!(
            OrderStatus::Confirmed.transition(OrderStatus::Pending, true),
            Ok(OrderStatus::Pending)
        );
        assert_eq!(
            OrderStatus::Cancelled.transition(OrderStatus::Confirmed, true),
            Ok(OrderStatus::Confirmed)
        );
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(OrderStatus::Pending.as_str(), "pending");
        assert_eq!("cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("en_attente".parse::<OrderStatus>().is_err());

        let json = serde_json::to_string(&OrderStatus::Confirmed).expect("serialize");
        assert_eq!(json, "\"confirmed\"");
    }
}
