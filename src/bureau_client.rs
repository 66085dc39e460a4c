use crate::errors::AppError;
use crate::models::{BureauEnvelope, Cuit, DebtRecord, HistoricalRecord};
use regex::Regex;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the BCRA "Central de Deudores" credit-bureau API.
///
/// Translates every failure mode — invalid identifier, no data, upstream
/// failure, undocumented status, transport error — into the [`AppError`]
/// taxonomy. Never retries: a single failed attempt is surfaced to the
/// caller, which may retry at its discretion.
#[derive(Clone)]
pub struct BcraClient {
    client: reqwest::Client,
    base_url: String,
}

impl BcraClient {
    /// Creates a new `BcraClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the bureau API.
    /// * `timeout` - Request-level timeout; on expiry the fetch fails with
    ///   `NetworkError`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to create BCRA client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    /// Fetches the current-debt snapshot for a taxpayer.
    ///
    /// The raw identifier is normalized first; anything that is not an
    /// 11-digit CUIT fails with `InvalidIdentifier` before any network call.
    pub async fn fetch_current_debt(&self, taxpayer_id: &str) -> Result<DebtRecord, AppError> {
        let cuit = Cuit::parse(taxpayer_id)?;
        let url = format!("{}/Deudas/{}", self.base_url, cuit);
        tracing::info!("Fetching current debt for {} from BCRA", cuit);

        let record: DebtRecord = self.fetch_envelope(&url).await?;
        validate_period_labels(record.periods.iter().map(|p| p.period.as_str()))?;
        Ok(record)
    }

    /// Fetches the 24-month historical-debt record for a taxpayer.
    ///
    /// Same identifier contract as [`Self::fetch_current_debt`].
    pub async fn fetch_historical_debt(
        &self,
        taxpayer_id: &str,
    ) -> Result<HistoricalRecord, AppError> {
        let cuit = Cuit::parse(taxpayer_id)?;
        let url = format!("{}/Deudas/Historicas/{}", self.base_url, cuit);
        tracing::info!("Fetching historical debt for {} from BCRA", cuit);

        let record: HistoricalRecord = self.fetch_envelope(&url).await?;
        validate_period_labels(record.periods.iter().map(|p| p.period.as_str()))?;
        Ok(record)
    }

    /// Performs the GET, decodes the `{status, results, errorMessages}`
    /// envelope, and maps the body status through the error taxonomy.
    async fn fetch_envelope<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("BCRA request failed: {}", e)))?;

        let transport_status = response.status().as_u16();
        let envelope: BureauEnvelope<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                // No well-formed envelope; fall back to the transport status
                // so a bare 500 still maps to UpstreamUnavailable.
                return Err(error_from_status(
                    transport_status,
                    vec![format!("Failed to parse BCRA response: {}", e)],
                ));
            }
        };

        match envelope.status {
            200 => envelope.results.ok_or_else(|| AppError::UnexpectedResponse {
                status: 200,
                messages: vec!["BCRA reported success without a results payload".to_string()],
            }),
            status => Err(error_from_status(status, envelope.error_messages)),
        }
    }
}

/// Maps a bureau status code (body or transport) to the error taxonomy.
fn error_from_status(status: u16, messages: Vec<String>) -> AppError {
    match status {
        400 => AppError::InvalidIdentifier(messages),
        404 => AppError::NotFound(messages),
        500 => AppError::UpstreamUnavailable(messages),
        other => AppError::UnexpectedResponse {
            status: other,
            messages,
        },
    }
}

/// Period labels are fixed-width `YYYYMM`. Anything else is a malformed
/// payload and fails the fetch here, so the analyzer never sees it.
fn validate_period_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Result<(), AppError> {
    let label_format = Regex::new(r"^\d{6}$").unwrap();
    for label in labels {
        if !label_format.is_match(label) {
            return Err(AppError::UnexpectedResponse {
                status: 200,
                messages: vec![format!("Malformed period label in BCRA payload: '{}'", label)],
            });
        }
    }
    Ok(())
}
