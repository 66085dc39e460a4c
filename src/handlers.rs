use crate::assessment;
use crate::bureau_client::BcraClient;
use crate::circuit_breaker::BureauCircuitBreaker;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{AssessmentResponse, Cuit, DebtRecord, HistoricalRecord};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the BCRA credit-bureau API.
    pub bureau: BcraClient,
    /// Circuit breaker shared by all bureau calls.
    pub bureau_breaker: BureauCircuitBreaker,
    /// Per-CUIT cache of current-debt records. Latency shim only: keyed on
    /// the normalized CUIT, TTL-bounded, integrity-checked on read.
    pub current_debt_cache: Cache<String, String>,
    /// Per-CUIT cache of historical records, same policy.
    pub historical_debt_cache: Cache<String, String>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-bcra-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/v1/debts/:cuit
///
/// Current-debt snapshot for a taxpayer, fetched through the cache.
///
/// # Returns
///
/// * `Result<Json<DebtRecord>, AppError>` - The record, or a typed bureau error.
pub async fn get_current_debt(
    State(state): State<Arc<AppState>>,
    Path(cuit): Path<String>,
) -> Result<Json<DebtRecord>, AppError> {
    tracing::info!("GET /debts/{}", cuit);

    let cuit = Cuit::parse(&cuit)?;
    let record = assessment::fetch_current_cached(&state, &cuit).await?;
    Ok(Json(record))
}

/// GET /api/v1/debts/historical/:cuit
///
/// 24-month historical record for a taxpayer, fetched through the cache.
pub async fn get_historical_debt(
    State(state): State<Arc<AppState>>,
    Path(cuit): Path<String>,
) -> Result<Json<HistoricalRecord>, AppError> {
    tracing::info!("GET /debts/historical/{}", cuit);

    let cuit = Cuit::parse(&cuit)?;
    let record = assessment::fetch_historical_cached(&state, &cuit).await?;
    Ok(Json(record))
}

/// GET /api/v1/assessments/:cuit
///
/// Full pre-qualification: both bureau fetches, degraded-mode tolerance,
/// eligibility verdict. Only an invalid identifier is an error here — a
/// failed bureau fetch degrades the analysis instead of aborting it.
pub async fn assess_eligibility(
    State(state): State<Arc<AppState>>,
    Path(cuit): Path<String>,
) -> Result<Json<AssessmentResponse>, AppError> {
    tracing::info!("GET /assessments/{}", cuit);

    let cuit = Cuit::parse(&cuit)?;
    let response = assessment::assess(&state, &cuit).await;

    tracing::info!(
        "Assessment for {} finished: {:?} (degraded: {})",
        response.cuit,
        response.verdict.status,
        response.metadata.degraded
    );

    Ok(Json(response))
}
