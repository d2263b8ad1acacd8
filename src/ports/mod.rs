//! Ports: the traits the application layer depends on.

mod order_store;
mod payment_gateway;

pub use order_store::OrderStore;
pub use payment_gateway::{
    CreateSessionRequest, GatewayPaymentStatus, GatewaySession, PaymentGateway,
};
