//! Payment domain: the signature protocol and the order lifecycle.

mod errors;
mod order;
mod signature;

pub use errors::PaymentError;
pub use order::{OrderId, OrderStatus, PaymentOrder};
pub use signature::{SignatureCodec, SignedParams, SIGNATURE_KEY};
