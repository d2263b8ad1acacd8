//! Flow gateway client.
//!
//! Implements the `PaymentGateway` port over Flow's REST API: every call
//! carries the full parameter set signed with the shared secret in the
//! reserved `s` parameter. Session creation is a form-encoded POST; status
//! queries are signed GETs.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::config::GatewayConfig;
use crate::domain::payment::{OrderStatus, PaymentError, SignatureCodec, SignedParams, SIGNATURE_KEY};
use crate::ports::{CreateSessionRequest, GatewayPaymentStatus, GatewaySession, PaymentGateway};

use super::dto::FlowCreateResponse;

/// Flow API client.
pub struct FlowClient {
    api_key: SecretString,
    codec: SignatureCodec,
    base_url: String,
    http_client: reqwest::Client,
}

impl FlowClient {
    /// Creates a client from the gateway configuration. Outbound calls are
    /// bounded by `request_timeout` so gateway slowness cannot pile up
    /// in-flight requests indefinitely.
    pub fn new(config: &GatewayConfig, request_timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("HTTP client construction");

        Self {
            api_key: config.api_key.clone(),
            codec: SignatureCodec::new(config.secret_key.clone()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    /// Assembles and signs the parameter set for session creation.
    fn signed_create_params(&self, request: &CreateSessionRequest) -> SignedParams {
        let mut params = SignedParams::new();
        params
            .insert("apiKey", self.api_key.expose_secret())
            .insert("commerceOrder", &request.order_id)
            .insert("subject", &request.subject)
            .insert("amount", request.amount)
            .insert("email", &request.email)
            .insert("urlConfirmation", &request.confirmation_url)
            .insert("urlReturn", &request.return_url);
        if let Some(optional) = &request.optional {
            params.insert("optional", optional);
        }
        let signature = self.codec.sign(&params);
        params.insert(SIGNATURE_KEY, signature);
        params
    }

    /// Assembles and signs the parameter set for a status query.
    fn signed_status_params(&self, token: &str) -> SignedParams {
        let mut params = SignedParams::new();
        params
            .insert("apiKey", self.api_key.expose_secret())
            .insert("token", token);
        let signature = self.codec.sign(&params);
        params.insert(SIGNATURE_KEY, signature);
        params
    }
}

#[async_trait]
impl PaymentGateway for FlowClient {
    async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<GatewaySession, PaymentError> {
        let params = self.signed_create_params(&request);
        let url = format!("{}/payment/create", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .form(&params.to_pairs())
            .send()
            .await
            .map_err(|e| PaymentError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::transport(e.to_string()))?;

        let parsed: FlowCreateResponse = serde_json::from_str(&body).map_err(|_| {
            PaymentError::gateway(format!("non-JSON create response ({}): {}", status, body))
        })?;

        match (parsed.url, parsed.token) {
            (Some(url), Some(token)) => {
                tracing::info!(
                    order_id = %request.order_id,
                    "Payment session created at gateway"
                );
                Ok(GatewaySession { url, token })
            }
            _ => {
                tracing::error!(
                    order_id = %request.order_id,
                    http_status = %status,
                    "Gateway refused session creation"
                );
                Err(PaymentError::gateway(format!(
                    "create response missing url/token ({}): {}",
                    status, body
                )))
            }
        }
    }

    async fn payment_status(&self, token: &str) -> Result<GatewayPaymentStatus, PaymentError> {
        let params = self.signed_status_params(token);
        let url = format!("{}/payment/getStatus", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&params.to_pairs())
            .send()
            .await
            .map_err(|e| PaymentError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::transport(e.to_string()))?;

        let raw: serde_json::Value = serde_json::from_str(&body).map_err(|_| {
            PaymentError::gateway(format!("non-JSON status response ({}): {}", status, body))
        })?;

        let code = extract_status_code(&raw).ok_or_else(|| {
            PaymentError::gateway(format!("status response missing status field: {}", body))
        })?;

        Ok(GatewayPaymentStatus {
            status: OrderStatus::from_gateway_code(&code),
            raw,
        })
    }
}

/// The gateway reports `status` as a number or a numeric string depending
/// on the endpoint version; normalize to the string code.
fn extract_status_code(raw: &serde_json::Value) -> Option<String> {
    match raw.get("status")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
