/// Shared pre-qualification workflow for the HTTP handlers
///
/// This module provides reusable functions for the assessment flow:
/// 1. Fetch current + historical bureau records concurrently
/// 2. Treat each failed fetch as that record being absent (degraded mode)
/// 3. Run the eligibility analysis on whatever was obtained
/// 4. Assemble the response with verdict, records, and metadata
///
/// The degraded-mode tolerance is deliberate: an advisor with only partial
/// bureau data still gets a PENDING or partial verdict instead of an error.
use crate::cache_validator::ValidatedCacheEntry;
use crate::circuit_breaker::is_bureau_outage;
use crate::eligibility::analyze_debts;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{AssessmentResponse, Cuit, DebtRecord, HistoricalRecord, ResponseMetadata};
use chrono::Utc;
use failsafe::futures::CircuitBreaker;
use std::future::Future;
use std::sync::Arc;

/// Fetches the current-debt record through the per-CUIT cache.
///
/// Cache entries are integrity-checked; a poisoned entry is dropped and the
/// record is refetched from the bureau.
pub async fn fetch_current_cached(
    state: &Arc<AppState>,
    cuit: &Cuit,
) -> Result<DebtRecord, AppError> {
    let cache_key = format!("current:{}", cuit);

    if let Some(serialized) = state.current_debt_cache.get(&cache_key).await {
        if let Some(record) = ValidatedCacheEntry::decode::<DebtRecord>(&serialized) {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(record);
        }
        // Poisoned or stale-format entry: drop it and refetch.
        state.current_debt_cache.invalidate(&cache_key).await;
    }

    let record = guard_bureau_call(state, state.bureau.fetch_current_debt(cuit.as_str())).await?;

    match ValidatedCacheEntry::encode(&record) {
        Ok(serialized) => state.current_debt_cache.insert(cache_key, serialized).await,
        Err(e) => tracing::warn!("Skipping cache write for {}: {}", cache_key, e),
    }

    Ok(record)
}

/// Fetches the historical record through the per-CUIT cache.
pub async fn fetch_historical_cached(
    state: &Arc<AppState>,
    cuit: &Cuit,
) -> Result<HistoricalRecord, AppError> {
    let cache_key = format!("historical:{}", cuit);

    if let Some(serialized) = state.historical_debt_cache.get(&cache_key).await {
        if let Some(record) = ValidatedCacheEntry::decode::<HistoricalRecord>(&serialized) {
            tracing::debug!("Cache hit for {}", cache_key);
            return Ok(record);
        }
        state.historical_debt_cache.invalidate(&cache_key).await;
    }

    let record =
        guard_bureau_call(state, state.bureau.fetch_historical_debt(cuit.as_str())).await?;

    match ValidatedCacheEntry::encode(&record) {
        Ok(serialized) => {
            state
                .historical_debt_cache
                .insert(cache_key, serialized)
                .await
        }
        Err(e) => tracing::warn!("Skipping cache write for {}: {}", cache_key, e),
    }

    Ok(record)
}

/// Runs the full pre-qualification for one taxpayer.
///
/// Both fetches are issued concurrently; they share no state. A failed
/// fetch is logged and substituted with an absent record — an explicit
/// `Option`, not a swallowed error — before the analyzer runs, so this
/// function always produces a response.
pub async fn assess(state: &Arc<AppState>, cuit: &Cuit) -> AssessmentResponse {
    let (current_result, historical_result) = tokio::join!(
        fetch_current_cached(state, cuit),
        fetch_historical_cached(state, cuit),
    );

    let mut sources = Vec::new();
    let mut degraded = false;

    let current = match current_result {
        Ok(record) => {
            sources.push("bcra_current".to_string());
            Some(record)
        }
        Err(e) => {
            tracing::warn!(
                "Current-debt fetch failed for {}, continuing without it: {}",
                cuit,
                e
            );
            degraded = true;
            None
        }
    };

    let historical = match historical_result {
        Ok(record) => {
            sources.push("bcra_historical".to_string());
            Some(record)
        }
        Err(e) => {
            tracing::warn!(
                "Historical fetch failed for {}, continuing without it: {}",
                cuit,
                e
            );
            degraded = true;
            None
        }
    };

    let verdict = analyze_debts(current.as_ref(), historical.as_ref());

    let denomination = current
        .as_ref()
        .map(|r| r.denomination.clone())
        .or_else(|| historical.as_ref().map(|r| r.denomination.clone()));

    AssessmentResponse {
        cuit: cuit.to_string(),
        denomination,
        verdict,
        current,
        historical,
        metadata: ResponseMetadata {
            sources,
            degraded,
            timestamp: Utc::now().to_rfc3339(),
        },
    }
}

/// Routes a bureau call through the shared circuit breaker.
///
/// Only upstream outages count against the breaker; an open circuit is
/// surfaced as `UpstreamUnavailable` without contacting the bureau.
async fn guard_bureau_call<T>(
    state: &Arc<AppState>,
    call: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    match state.bureau_breaker.call_with(is_bureau_outage, call).await {
        Ok(value) => Ok(value),
        Err(failsafe::Error::Inner(err)) => Err(err),
        Err(failsafe::Error::Rejected) => Err(AppError::UpstreamUnavailable(vec![
            "Bureau circuit open: failing fast without contacting BCRA".to_string(),
        ])),
    }
}
