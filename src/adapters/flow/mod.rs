//! Flow gateway adapter.

mod client;
mod dto;

pub use client::FlowClient;
