//! Payment gateway port for outbound calls to Flow.
//!
//! Implementations own the wire details: parameter assembly, request
//! signing, form encoding, and response-shape validation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{OrderId, OrderStatus, PaymentError};

/// Port for the hosted-payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates a hosted checkout session. One synchronous call, no internal
    /// retry; failures surface immediately to the caller.
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<GatewaySession, PaymentError>;

    /// Queries the status of a checkout attempt by its session token.
    async fn payment_status(&self, token: &str) -> Result<GatewayPaymentStatus, PaymentError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Merchant order identifier (Flow's `commerceOrder`).
    pub order_id: OrderId,

    /// Human-readable purchase description.
    pub subject: String,

    /// Amount in whole currency units.
    pub amount: i64,

    /// Buyer email, pre-filled on the hosted page.
    pub email: String,

    /// URL the gateway calls back with the signed confirmation.
    pub confirmation_url: String,

    /// URL the buyer is redirected to after checkout.
    pub return_url: String,

    /// Opaque merchant metadata echoed back by the gateway.
    pub optional: Option<serde_json::Value>,
}

/// A created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySession {
    /// Hosted checkout page URL.
    pub url: String,

    /// Opaque session token identifying this checkout attempt.
    pub token: String,
}

impl GatewaySession {
    /// The URL the buyer's browser is sent to.
    pub fn redirect_url(&self) -> String {
        format!("{}?token={}", self.url, self.token)
    }
}

/// Status of a checkout attempt as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPaymentStatus {
    /// Mapped order status.
    pub status: OrderStatus,

    /// Raw gateway response, passed through for diagnostics and the
    /// browser-facing status endpoint.
    pub raw: serde_json::Value,
}
