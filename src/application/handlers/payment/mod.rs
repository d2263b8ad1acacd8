//! Payment command and query handlers.

mod confirm_payment;
mod create_session;
mod get_status;

pub use confirm_payment::{ConfirmPaymentCommand, ConfirmPaymentHandler, ConfirmPaymentOutcome};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use get_status::{GetStatusHandler, GetStatusQuery, GetStatusResult};
