use crate::errors::AppError;
use failsafe::{backoff, failure_policy, Config, StateMachine};
use std::time::Duration;

/// Circuit breaker instance guarding BCRA calls. Cloning shares state, so
/// one instance in the application state covers all handlers.
pub type BureauCircuitBreaker =
    StateMachine<failure_policy::ConsecutiveFailures<backoff::Exponential>, ()>;

/// Creates the circuit breaker for bureau operations to prevent hammering a
/// failing upstream.
///
/// # Configuration
///
/// - **Failure threshold**: 5 consecutive failures triggers OPEN state.
/// - **Backoff**: Exponential backoff from 10s to 60s before attempting recovery.
///
/// # States
///
/// - **CLOSED**: Normal operation, requests pass through.
/// - **OPEN**: Too many failures, requests fail fast without contacting BCRA.
/// - **HALF_OPEN**: Testing if the bureau recovered.
///
/// The breaker never retries a call; an open circuit surfaces as
/// `UpstreamUnavailable` to the caller immediately.
pub fn create_bureau_circuit_breaker() -> BureauCircuitBreaker {
    let backoff_strategy = backoff::exponential(
        Duration::from_secs(10), // Initial delay
        Duration::from_secs(60), // Maximum delay
    );

    let failure_policy = failure_policy::consecutive_failures(5, backoff_strategy);

    Config::new().failure_policy(failure_policy).build()
}

/// Only upstream outages should trip the breaker. A 404 or a rejected CUIT
/// is a well-formed bureau answer, not a sign the bureau is down.
pub fn is_bureau_outage(err: &AppError) -> bool {
    matches!(
        err,
        AppError::UpstreamUnavailable(_)
            | AppError::NetworkError(_)
            | AppError::UnexpectedResponse { .. }
    )
}
