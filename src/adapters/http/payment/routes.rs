//! Axum router configuration for payment endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    api_payment_status, create_payment, health, payment_confirmation, payment_status_page,
    PaymentAppState,
};

/// Create the complete payment router.
///
/// # Routes
///
/// ## Merchant API
/// - `POST /api/createPayment` - Initiate a payment session
/// - `GET /api/paymentStatus/:orderId` - Query order status
///
/// ## Gateway callback (no auth, signature verified)
/// - `POST /api/paymentConfirmation` - Confirmation callback
///
/// ## Buyer-facing
/// - `GET /paymentStatus/:orderId` - Status page after checkout
///
/// ## Operational
/// - `GET /health` - Liveness probe
pub fn payment_router() -> Router<PaymentAppState> {
    Router::new()
        .route("/api/createPayment", post(create_payment))
        .route("/api/paymentConfirmation", post(payment_confirmation))
        .route("/api/paymentStatus/:order_id", get(api_payment_status))
        .route("/paymentStatus/:order_id", get(payment_status_page))
        .route("/health", get(health))
}
