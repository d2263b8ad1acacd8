//! Payment HTTP adapter: DTOs, handlers, and routes.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PaymentApiError, PaymentAppState};
pub use routes::payment_router;
