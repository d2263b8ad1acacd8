//! GetStatusHandler - Query handler for payment status lookups.

use std::sync::Arc;

use crate::domain::payment::{OrderId, OrderStatus, PaymentError};
use crate::ports::{OrderStore, PaymentGateway};

/// Query for the current status of an order.
#[derive(Debug, Clone)]
pub struct GetStatusQuery {
    pub order_id: OrderId,
    /// Gateway session token; used when the stored order carries none.
    pub token: Option<String>,
}

/// Resolved status plus the raw gateway payload (when the gateway was asked).
#[derive(Debug, Clone)]
pub struct GetStatusResult {
    pub status: OrderStatus,
    pub gateway_response: serde_json::Value,
}

/// Handler for status queries.
///
/// The local record is authoritative once terminal. Only pending orders go
/// out to the gateway, and a terminal answer from the gateway is written
/// back so later reads stay local.
pub struct GetStatusHandler {
    store: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl GetStatusHandler {
    pub fn new(store: Arc<dyn OrderStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { store, gateway }
    }

    pub async fn handle(&self, query: GetStatusQuery) -> Result<GetStatusResult, PaymentError> {
        let order = self
            .store
            .get(&query.order_id)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(query.order_id.clone()))?;

        if order.status.is_terminal() {
            return Ok(GetStatusResult {
                status: order.status,
                gateway_response: serde_json::json!({
                    "commerceOrder": order.order_id.as_str(),
                    "status": order.status.gateway_code(),
                }),
            });
        }

        let token = query
            .token
            .or(order.gateway_token)
            .ok_or_else(|| PaymentError::validation("token", "no session token for order"))?;

        let gateway_status = self.gateway.payment_status(&token).await?;

        if gateway_status.status.is_terminal() {
            self.store
                .update_status(&query.order_id, gateway_status.status)
                .await?;
        }

        Ok(GetStatusResult {
            status: gateway_status.status,
            gateway_response: gateway_status.raw,
        })
    }
}
