//! In-memory order store.
//!
//! Test double and default store for deployments without a database. A
//! single mutex makes every read-modify-write atomic per call, which is all
//! the transition contract needs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::payment::{OrderId, OrderStatus, PaymentError, PaymentOrder};
use crate::ports::OrderStore;

/// In-memory implementation of the `OrderStore` port.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, PaymentOrder>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(&self, order: &PaymentOrder) -> Result<(), PaymentError> {
        let mut orders = self.orders.lock().expect("order store mutex");
        orders.insert(order.order_id.clone(), order.clone());
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<PaymentOrder>, PaymentError> {
        let orders = self.orders.lock().expect("order store mutex");
        Ok(orders.get(order_id).cloned())
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<PaymentOrder, PaymentError> {
        let mut orders = self.orders.lock().expect("order store mutex");
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.clone()))?;
        order.apply_gateway_status(status);
        Ok(order.clone())
    }
}
