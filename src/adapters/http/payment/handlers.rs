//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::application::handlers::payment::{
    ConfirmPaymentCommand, ConfirmPaymentHandler, CreateSessionCommand, CreateSessionHandler,
    GetStatusHandler, GetStatusQuery,
};
use crate::domain::payment::{OrderId, PaymentError, SignatureCodec};
use crate::ports::{OrderStore, PaymentGateway};

use super::dto::{
    status_wire_code, CreatePaymentRequest, CreatePaymentResponse, ErrorResponse, HealthResponse,
    PaymentStatusResponse, StatusQueryParams,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct PaymentAppState {
    pub order_store: Arc<dyn OrderStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub codec: SignatureCodec,
    pub public_base_url: String,
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_session_handler(&self) -> CreateSessionHandler {
        CreateSessionHandler::new(
            self.order_store.clone(),
            self.gateway.clone(),
            self.public_base_url.clone(),
        )
    }

    pub fn confirm_payment_handler(&self) -> ConfirmPaymentHandler {
        ConfirmPaymentHandler::new(self.order_store.clone(), self.codec.clone())
    }

    pub fn get_status_handler(&self) -> GetStatusHandler {
        GetStatusHandler::new(self.order_store.clone(), self.gateway.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Request Extraction
// ════════════════════════════════════════════════════════════════════════════════

/// JSON extractor whose rejection carries the API's error body.
///
/// The bare `Json` extractor answers malformed bodies with axum's plain-text
/// rejection; this wrapper routes them through `PaymentApiError` so every
/// client-facing error shares the `{success, message}` shape.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = PaymentApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(PaymentApiError(PaymentError::validation(
                "body",
                rejection.body_text(),
            ))),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/createPayment - Initiate a payment session
pub async fn create_payment(
    State(state): State<PaymentAppState>,
    ApiJson(request): ApiJson<CreatePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.create_session_handler();
    let cmd = CreateSessionCommand {
        amount: request.amount,
        email: request.email,
        metadata: request.metadata,
    };

    let result = handler.handle(cmd).await?;

    let response = CreatePaymentResponse {
        success: true,
        flow_url: result.redirect_url,
        token: result.token,
        order_id: result.order_id.to_string(),
    };

    Ok(Json(response))
}

/// POST /api/paymentConfirmation - Gateway confirmation callback
///
/// The gateway treats anything but 200 as a delivery failure and retries, so
/// the body is a fixed plain-text acknowledgment rather than JSON. A failed
/// signature check is the one case that must NOT acknowledge.
pub async fn payment_confirmation(
    State(state): State<PaymentAppState>,
    body: Bytes,
) -> Response {
    let form: Vec<(String, String)> = match serde_urlencoded::from_bytes(&body) {
        Ok(form) => form,
        Err(_) => {
            tracing::warn!("Confirmation callback body is not a valid form");
            return (StatusCode::FORBIDDEN, "Invalid Signature").into_response();
        }
    };

    let handler = state.confirm_payment_handler();
    match handler.handle(ConfirmPaymentCommand { form }).await {
        Ok(_) => (StatusCode::OK, "OK").into_response(),
        Err(PaymentError::InvalidSignature) => {
            (StatusCode::FORBIDDEN, "Invalid Signature").into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Confirmation callback processing failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error processing confirmation",
            )
                .into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/paymentStatus/:orderId - Query the current status of an order
pub async fn api_payment_status(
    State(state): State<PaymentAppState>,
    Path(order_id): Path<String>,
    Query(query): Query<StatusQueryParams>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.get_status_handler();
    let result = handler
        .handle(GetStatusQuery {
            order_id: OrderId::new(order_id),
            token: query.token,
        })
        .await?;

    let response = PaymentStatusResponse {
        success: true,
        status: status_wire_code(result.status),
        flow_response: result.gateway_response,
    };

    Ok(Json(response))
}

/// GET /paymentStatus/:orderId - Buyer-facing status page after checkout
pub async fn payment_status_page(
    State(state): State<PaymentAppState>,
    Path(order_id): Path<String>,
    Query(query): Query<StatusQueryParams>,
) -> Html<String> {
    let handler = state.get_status_handler();
    let result = handler
        .handle(GetStatusQuery {
            order_id: OrderId::new(&order_id),
            token: query.token,
        })
        .await;

    let (heading, detail) = match result {
        Ok(result) => match status_wire_code(result.status) {
            1 => ("Payment approved", "Thank you, your payment was received."),
            2 => ("Payment rejected", "The payment was not completed."),
            _ => ("Payment pending", "The payment is still being processed."),
        },
        Err(PaymentError::OrderNotFound(_)) => {
            ("Order not found", "We have no record of this order.")
        }
        Err(err) => {
            tracing::error!(error = %err, order_id = %order_id, "Status page lookup failed");
            (
                "Status unavailable",
                "We could not determine the payment status right now.",
            )
        }
    };

    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{heading}</title></head>\n\
         <body>\n<h1>{heading}</h1>\n<p>{detail}</p>\n<p>Order: {order_id}</p>\n</body>\n</html>"
    ))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PaymentError::Validation { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            PaymentError::InvalidSignature => {
                (StatusCode::FORBIDDEN, "Invalid Signature".to_string())
            }
            PaymentError::OrderNotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            PaymentError::Gateway { .. }
            | PaymentError::Transport(_)
            | PaymentError::Store(_) => {
                // Upstream detail goes to the log, never the client.
                tracing::error!(error = %self.0, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
