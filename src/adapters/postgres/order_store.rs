//! PostgreSQL implementation of the OrderStore port.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE payment_orders (
//!     order_id      TEXT PRIMARY KEY,
//!     amount        BIGINT NOT NULL,
//!     payer_email   TEXT NOT NULL,
//!     status        TEXT NOT NULL,
//!     gateway_token TEXT,
//!     created_at    TIMESTAMPTZ NOT NULL
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::payment::{OrderId, OrderStatus, PaymentError, PaymentOrder};
use crate::ports::OrderStore;

/// PostgreSQL implementation of the `OrderStore` port.
///
/// Uses sqlx with connection pooling. Terminal-state stickiness is enforced
/// inside the UPDATE itself, so concurrent duplicate callbacks cannot flip a
/// settled order regardless of interleaving.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    order_id: String,
    amount: i64,
    payer_email: String,
    status: String,
    gateway_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for PaymentOrder {
    type Error = PaymentError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(PaymentOrder {
            order_id: OrderId::new(row.order_id),
            amount: row.amount,
            payer_email: row.payer_email,
            status: parse_status(&row.status)?,
            gateway_token: row.gateway_token,
            created_at: row.created_at,
        })
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, PaymentError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "approved" => Ok(OrderStatus::Approved),
        "rejected" => Ok(OrderStatus::Rejected),
        _ => Err(PaymentError::store(format!("invalid status value: {}", s))),
    }
}

fn status_to_string(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Approved => "approved",
        OrderStatus::Rejected => "rejected",
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(&self, order: &PaymentOrder) -> Result<(), PaymentError> {
        sqlx::query(
            r#"
            INSERT INTO payment_orders (
                order_id, amount, payer_email, status, gateway_token, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.order_id.as_str())
        .bind(order.amount)
        .bind(&order.payer_email)
        .bind(status_to_string(order.status))
        .bind(&order.gateway_token)
        .bind(order.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PaymentError::store(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<PaymentOrder>, PaymentError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT order_id, amount, payer_email, status, gateway_token, created_at
            FROM payment_orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PaymentError::store(e.to_string()))?;

        row.map(PaymentOrder::try_from).transpose()
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<PaymentOrder, PaymentError> {
        // Only non-terminal rows are writable; duplicate or conflicting
        // deliveries fall through to the read below and return the settled
        // row unchanged.
        sqlx::query(
            r#"
            UPDATE payment_orders
            SET status = $2
            WHERE order_id = $1 AND status = 'pending'
            "#,
        )
        .bind(order_id.as_str())
        .bind(status_to_string(status))
        .execute(&self.pool)
        .await
        .map_err(|e| PaymentError::store(e.to_string()))?;

        self.get(order_id)
            .await?
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.clone()))
    }
}
