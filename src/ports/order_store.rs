//! Order persistence port.
//!
//! The core never assumes a specific storage technology; it only requires
//! atomic per-order read/update. Implementations: an in-memory double for
//! tests and databaseless deployments, and a PostgreSQL adapter.

use async_trait::async_trait;

use crate::domain::payment::{OrderId, OrderStatus, PaymentError, PaymentOrder};

/// Port for payment order persistence.
///
/// `update_status` must be atomic per order and honor the domain's
/// terminal-state stickiness: applying a status to a settled order is a
/// no-op that returns the stored order unchanged.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a freshly created order.
    async fn create(&self, order: &PaymentOrder) -> Result<(), PaymentError>;

    /// Fetches an order by id.
    async fn get(&self, order_id: &OrderId) -> Result<Option<PaymentOrder>, PaymentError>;

    /// Applies a gateway-reported status idempotently and returns the
    /// resulting order.
    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<PaymentOrder, PaymentError>;
}
