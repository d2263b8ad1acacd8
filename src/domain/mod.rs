//! Domain layer.

pub mod payment;
