//! Adapters: concrete implementations of the ports plus inbound HTTP.

pub mod flow;
pub mod http;
pub mod memory;
pub mod postgres;
