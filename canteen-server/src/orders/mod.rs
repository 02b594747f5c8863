//! Order workflow domain logic
//!
//! The status machine and the pure pricing/validation functions live here so
//! that both creation paths (self-service and admin-assisted) share one
//! implementation, and the invariants are testable without a database.

pub mod pricing;

pub use pricing::{
    ItemRequest, MealSnapshot, PricedLine, PricedOrder, amount_remaining, is_fully_paid,
    price_items, validate_items,
};

use serde::{Deserialize, Serialize};

/// Order status
///
/// Stored as lowercase strings; transitions go through
/// [`OrderStatus::can_transition_to`] instead of free-form overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting payment submission
    Pending,
    /// Payment submitted (possibly partial)
    Paid,
    /// Payment verified and fully covered
    Confirmed,
    /// Kitchen is preparing the order
    Preparing,
    /// Ready for pickup
    Ready,
    /// Picked up
    Completed,
    /// Cancelled by an administrator
    Cancelled,
    /// Sponsor-paid free-meal order (terminal, assigned at creation only)
    Free,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Free => "free",
        }
    }

    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "confirmed" => Some(Self::Confirmed),
            "preparing" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "free" => Some(Self::Free),
            _ => None,
        }
    }

    /// Terminal states never leave their state again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Free)
    }

    /// Whether a transition to `next` is legal
    ///
    /// Same-state writes are accepted as no-ops, so idempotent re-verification
    /// of an already-confirmed order stays `confirmed`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        match (*self, next) {
            (Self::Pending, Self::Paid)
            | (Self::Paid, Self::Confirmed)
            | (Self::Confirmed, Self::Preparing)
            | (Self::Preparing, Self::Ready)
            | (Self::Ready, Self::Completed) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_roundtrip() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
            OrderStatus::Free,
        ];
        for status in all {
            assert_eq!(OrderStatus::from_db(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_db("unknown"), None);
    }

    #[test]
    fn test_forward_progression() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Paid));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_no_backwards_transitions() {
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Paid));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_no_skipping_ahead() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Ready));
    }

    #[test]
    fn test_cancel_from_non_terminal_only() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::Cancelled));

        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Free.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_free_is_terminal_and_unreachable() {
        assert!(OrderStatus::Free.is_terminal());
        for status in [
            OrderStatus::Pending,
            OrderStatus::Paid,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(!status.can_transition_to(OrderStatus::Free));
        }
    }

    #[test]
    fn test_same_state_is_noop() {
        // Idempotent re-verification: confirmed stays confirmed
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
        let status: OrderStatus = serde_json::from_str("\"free\"").unwrap();
        assert_eq!(status, OrderStatus::Free);
    }
}
