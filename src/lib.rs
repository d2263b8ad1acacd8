//! Flowgate - Merchant Integration Backend for the Flow Payment Gateway
//!
//! This crate lets a merchant site create hosted payment sessions, verify
//! the gateway's signed confirmation callbacks, and answer order status
//! queries from the buyer's browser.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
