//! Request/response DTOs for the payment HTTP API.

use serde::{Deserialize, Serialize};

use crate::domain::payment::OrderStatus;

/// POST /api/createPayment request body.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: i64,
    pub email: String,
    /// Optional merchant metadata forwarded to the gateway verbatim.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// POST /api/createPayment response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentResponse {
    pub success: bool,
    pub flow_url: String,
    pub token: String,
    pub order_id: String,
}

/// Query string for GET /api/paymentStatus/:orderId.
#[derive(Debug, Deserialize)]
pub struct StatusQueryParams {
    pub token: Option<String>,
}

/// GET /api/paymentStatus/:orderId response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub success: bool,
    /// Gateway status code: 1 approved, 2 rejected, 3 pending.
    pub status: u8,
    pub flow_response: serde_json::Value,
}

/// Generic error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// GET /health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Numeric wire code for a status, matching the gateway's taxonomy.
pub fn status_wire_code(status: OrderStatus) -> u8 {
    match status {
        OrderStatus::Approved => 1,
        OrderStatus::Rejected => 2,
        OrderStatus::Pending => 3,
    }
}
