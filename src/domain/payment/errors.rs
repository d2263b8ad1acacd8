//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | InvalidSignature | 403 |
//! | OrderNotFound | 404 |
//! | Gateway | 500 |
//! | Transport | 500 |
//! | Store | 500 |

use thiserror::Error;

use super::order::OrderId;

/// Errors from payment session creation, callback handling, and status
/// queries.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// Bad or missing input to session creation.
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// Callback signature mismatch. A security boundary: no state is
    /// mutated and the failure is logged as a security event.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Malformed or failing response from the gateway. Carries the raw
    /// response body for diagnostics; only a generic message reaches the
    /// caller.
    #[error("Gateway error: {detail}")]
    Gateway { detail: String },

    /// Network failure reaching the gateway. Surfaced like a gateway
    /// failure to the caller.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Order store failure.
    #[error("Order store error: {0}")]
    Store(String),
}

impl PaymentError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn gateway(detail: impl Into<String>) -> Self {
        PaymentError::Gateway {
            detail: detail.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        PaymentError::Transport(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        PaymentError::Store(message.into())
    }
}
