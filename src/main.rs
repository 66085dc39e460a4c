use axum::{
    routing::get,
    Router,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rust_bcra_api::bureau_client::BcraClient;
use rust_bcra_api::circuit_breaker::create_bureau_circuit_breaker;
use rust_bcra_api::config::Config;
use rust_bcra_api::handlers::{self, AppState};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Per-CUIT bureau record caches.
/// - The BCRA client and its circuit breaker.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_bcra_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Per-CUIT record caches. Latency shims for repeated lookups within an
    // advisor session; correctness never depends on a hit.
    let current_debt_cache = Cache::builder()
        .time_to_live(Duration::from_secs(config.cache_ttl_secs))
        .max_capacity(config.cache_capacity)
        .build();
    let historical_debt_cache = Cache::builder()
        .time_to_live(Duration::from_secs(config.cache_ttl_secs))
        .max_capacity(config.cache_capacity)
        .build();
    tracing::info!(
        "Bureau record caches initialized ({}s TTL, {} capacity)",
        config.cache_ttl_secs,
        config.cache_capacity
    );

    // Initialize the BCRA client
    let bureau = BcraClient::new(
        config.bcra_base_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize BCRA client: {}", e))?;
    tracing::info!("✓ BCRA client initialized: {}", config.bcra_base_url);

    // Build application state
    let app_state = Arc::new(AppState {
        config: config.clone(),
        bureau,
        bureau_breaker: create_bureau_circuit_breaker(),
        current_debt_cache,
        historical_debt_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/debts/:cuit", get(handlers::get_current_debt))
        .route(
            "/api/v1/debts/historical/:cuit",
            get(handlers::get_historical_debt),
        )
        .route(
            "/api/v1/assessments/:cuit",
            get(handlers::assess_eligibility),
        )
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (all endpoints are GET)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
