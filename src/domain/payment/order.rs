//! Payment order aggregate and status lifecycle.
//!
//! An order is created when a payment session is initiated, mutated only by
//! the verified confirmation callback, and read by the status query. The
//! gateway delivers callbacks at-least-once, so status transitions are
//! idempotent and terminal states are sticky.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique merchant-side order identifier.
///
/// Generated once per session initiation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    /// Generates a fresh identifier: millisecond timestamp plus a random
    /// suffix. Uniqueness is the only contract; the shape is incidental.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        OrderId(format!("ORDER-{}-{}", millis, &suffix[..8]))
    }

    /// Wraps an existing identifier, e.g. one echoed back by the gateway.
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Session created, awaiting the gateway's confirmation callback.
    Pending,

    /// Gateway confirmed the payment.
    Approved,

    /// Gateway rejected the payment (or reported an unknown outcome).
    Rejected,
}

impl OrderStatus {
    /// Approved and Rejected are terminal: once reached, the order never
    /// changes status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Approved | OrderStatus::Rejected)
    }

    /// Maps the gateway's numeric status code to an order status.
    ///
    /// Gateway taxonomy: 1 = approved, 2 = rejected, 3 = pending. Unknown
    /// codes are treated as rejections.
    pub fn from_gateway_code(code: &str) -> Self {
        match code {
            "1" => OrderStatus::Approved,
            "3" => OrderStatus::Pending,
            _ => OrderStatus::Rejected,
        }
    }

    /// The gateway's numeric code for this status.
    pub fn gateway_code(&self) -> &'static str {
        match self {
            OrderStatus::Approved => "1",
            OrderStatus::Rejected => "2",
            OrderStatus::Pending => "3",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// A merchant payment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Merchant-side order identifier (Flow's `commerceOrder`).
    pub order_id: OrderId,

    /// Amount in whole currency units; always positive.
    pub amount: i64,

    /// Buyer email address.
    pub payer_email: String,

    /// Current lifecycle status.
    pub status: OrderStatus,

    /// Session token issued by the gateway, once known.
    pub gateway_token: Option<String>,

    /// When the payment session was initiated.
    pub created_at: DateTime<Utc>,
}

impl PaymentOrder {
    /// Creates a pending order at session-initiation time.
    pub fn new(order_id: OrderId, amount: i64, payer_email: impl Into<String>) -> Self {
        Self {
            order_id,
            amount,
            payer_email: payer_email.into(),
            status: OrderStatus::Pending,
            gateway_token: None,
            created_at: Utc::now(),
        }
    }

    /// Applies a gateway-reported status idempotently.
    ///
    /// Returns the resulting status. Reapplying the current status is a
    /// no-op; any attempt to move away from a terminal status is ignored
    /// (duplicate or out-of-order deliveries must never regress or flip a
    /// settled order).
    pub fn apply_gateway_status(&mut self, incoming: OrderStatus) -> OrderStatus {
        if self.status.is_terminal() {
            if incoming != self.status {
                tracing::warn!(
                    order_id = %self.order_id,
                    current = %self.status,
                    incoming = %incoming,
                    "Ignoring status change on settled order"
                );
            }
            return self.status;
        }
        self.status = incoming;
        self.status
    }
}
