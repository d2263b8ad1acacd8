//! Wire types for Flow API responses.

use serde::Deserialize;

/// Response body of `POST /payment/create`.
///
/// Fields are optional because the gateway signals errors by shape: anything
/// missing `url` or `token` is not a created session.
#[derive(Debug, Deserialize)]
pub struct FlowCreateResponse {
    pub url: Option<String>,
    pub token: Option<String>,

    /// Gateway-side order number; informational only.
    #[serde(rename = "flowOrder")]
    #[allow(dead_code)]
    pub flow_order: Option<i64>,
}
