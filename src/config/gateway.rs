//! Flow gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Flow gateway configuration.
///
/// The API key identifies the merchant; the secret key signs every outbound
/// request and verifies every inbound confirmation callback. Both are held
/// as [`SecretString`] so they never leak through Debug output or logs.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Flow merchant API key
    pub api_key: SecretString,

    /// Shared HMAC signing secret
    pub secret_key: SecretString,

    /// Flow API base URL (sandbox or production)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// This service's externally reachable base URL, used to build the
    /// confirmation callback and buyer return URLs
    pub public_base_url: String,
}

impl GatewayConfig {
    /// Check if pointed at the Flow sandbox
    pub fn is_sandbox(&self) -> bool {
        self.base_url.contains("sandbox")
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_API_KEY"));
        }
        if self.secret_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY_SECRET_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidGatewayUrl);
        }
        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidPublicUrl);
        }
        Ok(())
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://sandbox.flow.cl/api".to_string()
}
