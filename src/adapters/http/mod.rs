//! Inbound HTTP adapters.

pub mod payment;
