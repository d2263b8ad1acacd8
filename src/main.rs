//! Flowgate service entrypoint.
//!
//! Loads configuration, wires the adapters into the payment router, and
//! serves it over HTTP.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flowgate::adapters::flow::FlowClient;
use flowgate::adapters::http::payment::{payment_router, PaymentAppState};
use flowgate::adapters::memory::InMemoryOrderStore;
use flowgate::adapters::postgres::PostgresOrderStore;
use flowgate::config::AppConfig;
use flowgate::domain::payment::SignatureCodec;
use flowgate::ports::OrderStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        sandbox = config.gateway.is_sandbox(),
        "Starting flowgate"
    );

    let order_store: Arc<dyn OrderStore> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .min_connections(database.min_connections)
                .max_connections(database.max_connections)
                .acquire_timeout(database.acquire_timeout())
                .connect(&database.url)
                .await?;
            tracing::info!("Connected to PostgreSQL order store");
            Arc::new(PostgresOrderStore::new(pool))
        }
        None => {
            tracing::warn!("No database configured; orders are held in memory only");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);
    let state = PaymentAppState {
        order_store,
        gateway: Arc::new(FlowClient::new(&config.gateway, request_timeout)),
        codec: SignatureCodec::new(config.gateway.secret_key.clone()),
        public_base_url: config.gateway.public_base_url.clone(),
    };

    let cors = build_cors(&config.server.cors_origins_list());
    let app = payment_router()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .with_state(state);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "Listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_cors(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}
