//! ConfirmPaymentHandler - Command handler for gateway confirmation callbacks.

use std::sync::Arc;

use crate::domain::payment::{
    OrderId, OrderStatus, PaymentError, SignatureCodec, SignedParams,
};
use crate::ports::OrderStore;

/// Command carrying the raw callback form fields, in delivery order.
#[derive(Debug, Clone)]
pub struct ConfirmPaymentCommand {
    pub form: Vec<(String, String)>,
}

/// Outcome of an authenticated callback.
///
/// Anything here is acknowledged to the gateway; only authentication and
/// infrastructure failures surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPaymentOutcome {
    /// Transition applied (or absorbed by an already-terminal order).
    Applied {
        order_id: OrderId,
        status: OrderStatus,
    },
    /// Signature was valid but the order is not known locally.
    UnknownOrder { order_id: OrderId },
    /// Signature was valid but the payload is missing required fields.
    Malformed,
}

/// Handler for confirmation callbacks.
///
/// Authentication comes first and gates everything else: the signature is
/// stripped from the payload, the remaining fields are re-signed locally,
/// and only a constant-time match lets the transition proceed.
pub struct ConfirmPaymentHandler {
    store: Arc<dyn OrderStore>,
    codec: SignatureCodec,
}

impl ConfirmPaymentHandler {
    pub fn new(store: Arc<dyn OrderStore>, codec: SignatureCodec) -> Self {
        Self { store, codec }
    }

    pub async fn handle(
        &self,
        cmd: ConfirmPaymentCommand,
    ) -> Result<ConfirmPaymentOutcome, PaymentError> {
        let mut params = SignedParams::from_pairs(cmd.form);

        let claimed = match params.take_signature() {
            Some(signature) => signature,
            None => {
                tracing::warn!("Confirmation callback rejected: no signature present");
                return Err(PaymentError::InvalidSignature);
            }
        };

        if !self.codec.verify(&params, &claimed) {
            tracing::warn!("Confirmation callback rejected: signature mismatch");
            return Err(PaymentError::InvalidSignature);
        }

        let order_id = match params.get("commerceOrder") {
            Some(id) if !id.is_empty() => OrderId::new(id),
            _ => {
                tracing::error!("Authenticated callback missing commerceOrder field");
                return Ok(ConfirmPaymentOutcome::Malformed);
            }
        };
        let status = OrderStatus::from_gateway_code(params.get("status").unwrap_or(""));

        match self.store.update_status(&order_id, status).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order_id,
                    status = %order.status,
                    "Confirmation callback processed"
                );
                Ok(ConfirmPaymentOutcome::Applied {
                    order_id,
                    status: order.status,
                })
            }
            Err(PaymentError::OrderNotFound(id)) => {
                // The gateway authenticated itself, so acknowledge and move
                // on rather than trigger redelivery of an order we will
                // never recognize.
                tracing::warn!(order_id = %id, "Authenticated callback for unknown order");
                Ok(ConfirmPaymentOutcome::UnknownOrder { order_id: id })
            }
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::domain::payment::{PaymentOrder, SIGNATURE_KEY};
    use secrecy::SecretString;

    fn codec() -> SignatureCodec {
        SignatureCodec::new(SecretString::new("test-secret".to_string()))
    }

    fn signed_form(fields: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut params = SignedParams::new();
        for (key, value) in fields {
            params.insert(*key, value);
        }
        let signature = codec().sign(&params);
        let mut form: Vec<(String, String)> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        form.push((SIGNATURE_KEY.to_string(), signature));
        form
    }

    async fn store_with_pending(id: &str) -> Arc<InMemoryOrderStore> {
        let store = Arc::new(InMemoryOrderStore::new());
        let order = PaymentOrder::new(OrderId::new(id), 1000, "buyer@example.com");
        store.create(&order).await.unwrap();
        store
    }

    #[tokio::test]
    async fn approves_order_on_valid_callback() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store.clone(), codec());

        let outcome = handler
            .handle(ConfirmPaymentCommand {
                form: signed_form(&[("commerceOrder", "ORDER-1"), ("status", "1")]),
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ConfirmPaymentOutcome::Applied {
                order_id: OrderId::new("ORDER-1"),
                status: OrderStatus::Approved,
            }
        );
        let order = store.get(&OrderId::new("ORDER-1")).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Approved);
    }

    #[tokio::test]
    async fn rejects_callback_without_signature() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store.clone(), codec());

        let result = handler
            .handle(ConfirmPaymentCommand {
                form: vec![
                    ("commerceOrder".to_string(), "ORDER-1".to_string()),
                    ("status".to_string(), "1".to_string()),
                ],
            })
            .await;

        assert!(matches!(result, Err(PaymentError::InvalidSignature)));
        let order = store.get(&OrderId::new("ORDER-1")).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn rejects_tampered_callback() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store.clone(), codec());

        let mut form = signed_form(&[("commerceOrder", "ORDER-1"), ("status", "2")]);
        // Flip the outcome after signing.
        for (key, value) in &mut form {
            if key == "status" {
                *value = "1".to_string();
            }
        }

        let result = handler.handle(ConfirmPaymentCommand { form }).await;
        assert!(matches!(result, Err(PaymentError::InvalidSignature)));

        let order = store.get(&OrderId::new("ORDER-1")).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_deliveries_are_idempotent() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store.clone(), codec());
        let form = signed_form(&[("commerceOrder", "ORDER-1"), ("status", "1")]);

        for _ in 0..3 {
            let outcome = handler
                .handle(ConfirmPaymentCommand { form: form.clone() })
                .await
                .unwrap();
            assert!(matches!(
                outcome,
                ConfirmPaymentOutcome::Applied {
                    status: OrderStatus::Approved,
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn conflicting_delivery_after_settlement_keeps_first_outcome() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store.clone(), codec());

        handler
            .handle(ConfirmPaymentCommand {
                form: signed_form(&[("commerceOrder", "ORDER-1"), ("status", "1")]),
            })
            .await
            .unwrap();
        let outcome = handler
            .handle(ConfirmPaymentCommand {
                form: signed_form(&[("commerceOrder", "ORDER-1"), ("status", "2")]),
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ConfirmPaymentOutcome::Applied {
                order_id: OrderId::new("ORDER-1"),
                status: OrderStatus::Approved,
            }
        );
    }

    #[tokio::test]
    async fn unknown_order_is_acknowledged_not_errored() {
        let store = Arc::new(InMemoryOrderStore::new());
        let handler = ConfirmPaymentHandler::new(store, codec());

        let outcome = handler
            .handle(ConfirmPaymentCommand {
                form: signed_form(&[("commerceOrder", "ORDER-ghost"), ("status", "1")]),
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ConfirmPaymentOutcome::UnknownOrder {
                order_id: OrderId::new("ORDER-ghost"),
            }
        );
    }

    #[tokio::test]
    async fn authenticated_payload_without_order_field_is_malformed() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store, codec());

        let outcome = handler
            .handle(ConfirmPaymentCommand {
                form: signed_form(&[("status", "1")]),
            })
            .await
            .unwrap();

        assert_eq!(outcome, ConfirmPaymentOutcome::Malformed);
    }

    #[tokio::test]
    async fn unrecognized_status_code_rejects_the_order() {
        let store = store_with_pending("ORDER-1").await;
        let handler = ConfirmPaymentHandler::new(store.clone(), codec());

        handler
            .handle(ConfirmPaymentCommand {
                form: signed_form(&[("commerceOrder", "ORDER-1"), ("status", "9")]),
            })
            .await
            .unwrap();

        let order = store.get(&OrderId::new("ORDER-1")).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Rejected);
    }
}
