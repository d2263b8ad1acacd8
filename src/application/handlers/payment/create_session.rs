//! CreateSessionHandler - Command handler for initiating a payment session.

use std::sync::Arc;

use crate::domain::payment::{OrderId, PaymentError, PaymentOrder};
use crate::ports::{CreateSessionRequest, OrderStore, PaymentGateway};

/// Default purchase description sent to the hosted checkout page.
const DEFAULT_SUBJECT: &str = "Online purchase";

/// Command to create a payment session.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    /// Amount in whole currency units; must be positive.
    pub amount: i64,
    /// Buyer email.
    pub email: String,
    /// Optional opaque merchant metadata forwarded to the gateway.
    pub metadata: Option<serde_json::Value>,
}

/// Result of a created session.
#[derive(Debug, Clone)]
pub struct CreateSessionResult {
    /// Where to send the buyer's browser.
    pub redirect_url: String,
    /// Gateway session token.
    pub token: String,
    /// Merchant order identifier.
    pub order_id: OrderId,
}

/// Handler for session creation.
///
/// Validates input, generates a fresh order id, submits the signed create
/// request through the gateway port, and records the pending order.
pub struct CreateSessionHandler {
    store: Arc<dyn OrderStore>,
    gateway: Arc<dyn PaymentGateway>,
    public_base_url: String,
}

impl CreateSessionHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        gateway: Arc<dyn PaymentGateway>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSessionCommand,
    ) -> Result<CreateSessionResult, PaymentError> {
        if cmd.amount <= 0 {
            return Err(PaymentError::validation("amount", "must be a positive number"));
        }
        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(PaymentError::validation("email", "must not be empty"));
        }

        let order_id = OrderId::generate();
        let base = self.public_base_url.trim_end_matches('/');

        let request = CreateSessionRequest {
            order_id: order_id.clone(),
            subject: DEFAULT_SUBJECT.to_string(),
            amount: cmd.amount,
            email: email.to_string(),
            confirmation_url: format!("{}/api/paymentConfirmation", base),
            return_url: format!("{}/paymentStatus/{}", base, order_id),
            optional: cmd.metadata,
        };

        let session = self.gateway.create_session(request).await?;

        let mut order = PaymentOrder::new(order_id.clone(), cmd.amount, email);
        order.gateway_token = Some(session.token.clone());
        self.store.create(&order).await?;

        tracing::info!(
            order_id = %order_id,
            amount = cmd.amount,
            "Payment session initiated"
        );

        Ok(CreateSessionResult {
            redirect_url: session.redirect_url(),
            token: session.token,
            order_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::domain::payment::OrderStatus;
    use crate::ports::{GatewayPaymentStatus, GatewaySession};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockGateway {
        requests: Mutex<Vec<CreateSessionRequest>>,
        response: Result<GatewaySession, PaymentError>,
    }

    impl MockGateway {
        fn returning(response: Result<GatewaySession, PaymentError>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for MockGateway {
        async fn create_session(
            &self,
            request: CreateSessionRequest,
        ) -> Result<GatewaySession, PaymentError> {
            self.requests.lock().unwrap().push(request);
            self.response.clone()
        }

        async fn payment_status(
            &self,
            _token: &str,
        ) -> Result<GatewayPaymentStatus, PaymentError> {
            unimplemented!("not exercised by session creation")
        }
    }

    fn test_session() -> GatewaySession {
        GatewaySession {
            url: "https://pay.test/p".to_string(),
            token: "tok123".to_string(),
        }
    }

    fn handler_with(
        gateway: Arc<MockGateway>,
    ) -> (CreateSessionHandler, Arc<InMemoryOrderStore>) {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = CreateSessionHandler::new(
            store.clone(),
            gateway,
            "https://shop.example.com",
        );
        (handler, store)
    }

    #[tokio::test]
    async fn creates_session_and_stores_pending_order() {
        let gateway = Arc::new(MockGateway::returning(Ok(test_session())));
        let (handler, store) = handler_with(gateway.clone());

        let result = handler
            .handle(CreateSessionCommand {
                amount: 1000,
                email: "buyer@example.com".to_string(),
                metadata: None,
            })
            .await
            .unwrap();

        assert_eq!(result.redirect_url, "https://pay.test/p?token=tok123");
        assert_eq!(result.token, "tok123");

        let order = store.get(&result.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.amount, 1000);
        assert_eq!(order.gateway_token.as_deref(), Some("tok123"));
    }

    #[tokio::test]
    async fn builds_callback_and_return_urls_from_public_base() {
        let gateway = Arc::new(MockGateway::returning(Ok(test_session())));
        let (handler, _store) = handler_with(gateway.clone());

        handler
            .handle(CreateSessionCommand {
                amount: 500,
                email: "buyer@example.com".to_string(),
                metadata: None,
            })
            .await
            .unwrap();

        let requests = gateway.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(
            request.confirmation_url,
            "https://shop.example.com/api/paymentConfirmation"
        );
        assert!(request
            .return_url
            .starts_with("https://shop.example.com/paymentStatus/ORDER-"));
    }

    #[tokio::test]
    async fn order_ids_are_fresh_per_initiation() {
        let gateway = Arc::new(MockGateway::returning(Ok(test_session())));
        let (handler, _store) = handler_with(gateway);

        let cmd = CreateSessionCommand {
            amount: 1000,
            email: "buyer@example.com".to_string(),
            metadata: None,
        };
        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();
        assert_ne!(first.order_id, second.order_id);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let gateway = Arc::new(MockGateway::returning(Ok(test_session())));
        let (handler, _store) = handler_with(gateway.clone());

        for amount in [0, -100] {
            let result = handler
                .handle(CreateSessionCommand {
                    amount,
                    email: "buyer@example.com".to_string(),
                    metadata: None,
                })
                .await;
            assert!(matches!(result, Err(PaymentError::Validation { .. })));
        }
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_empty_email() {
        let gateway = Arc::new(MockGateway::returning(Ok(test_session())));
        let (handler, _store) = handler_with(gateway);

        let result = handler
            .handle(CreateSessionCommand {
                amount: 1000,
                email: "   ".to_string(),
                metadata: None,
            })
            .await;
        assert!(matches!(result, Err(PaymentError::Validation { .. })));
    }

    #[tokio::test]
    async fn gateway_failure_stores_nothing() {
        let gateway = Arc::new(MockGateway::returning(Err(PaymentError::gateway(
            "missing url/token",
        ))));
        let (handler, store) = handler_with(gateway);

        let result = handler
            .handle(CreateSessionCommand {
                amount: 1000,
                email: "buyer@example.com".to_string(),
                metadata: None,
            })
            .await;

        assert!(matches!(result, Err(PaymentError::Gateway { .. })));
        // No phantom pending order for a session that never existed.
        assert!(store
            .get(&OrderId::new("ORDER-any"))
            .await
            .unwrap()
            .is_none());
    }
}
