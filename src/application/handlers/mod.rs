//! Application-level handlers grouped by bounded context.

pub mod payment;
