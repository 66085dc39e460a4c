use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============ Taxpayer Identifier ============

/// Normalized CUIT/CUIL taxpayer identifier: exactly 11 digits.
///
/// Constructed only through [`Cuit::parse`], so a value of this type is
/// always a valid cache key and a valid bureau path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cuit(String);

impl Cuit {
    /// Parses a raw identifier, stripping formatting characters.
    ///
    /// Accepts inputs like `"20-12345678-6"` or `"20 12345678 6"`; anything
    /// that does not normalize to exactly 11 digits is rejected here, before
    /// any network call is made.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 11 {
            return Err(AppError::InvalidIdentifier(vec![format!(
                "CUIT must normalize to exactly 11 digits; '{}' has {}",
                raw,
                digits.len()
            )]));
        }
        Ok(Self(digits))
    }

    /// The normalized 11-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============ Bureau Wire Models ============

/// JSON envelope every BCRA endpoint answers with.
///
/// `status` mirrors HTTP semantics inside the body (200/400/404/500), in
/// addition to the transport status. Error responses carry `errorMessages`
/// and no `results`.
#[derive(Debug, Clone, Deserialize)]
pub struct BureauEnvelope<T> {
    /// Status code as reported inside the body.
    pub status: u16,
    /// Result payload, present on success.
    pub results: Option<T>,
    /// Diagnostic messages, present on failure.
    #[serde(rename = "errorMessages", default)]
    pub error_messages: Vec<String>,
}

/// Current-debt snapshot for a taxpayer.
///
/// Immutable once fetched; one `Period` per month the bureau reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Taxpayer identifier as echoed by the bureau.
    #[serde(rename = "identificacion")]
    pub identification: u64,
    /// Display name of the taxpayer.
    #[serde(rename = "denominacion")]
    pub denomination: String,
    /// Reporting periods, as returned by the bureau.
    #[serde(rename = "periodos", default)]
    pub periods: Vec<Period>,
}

/// One reporting month of the current snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Year-month label, fixed-width `YYYYMM`.
    #[serde(rename = "periodo")]
    pub period: String,
    /// One entry per financial institution reporting debt this month.
    #[serde(rename = "entidades", default)]
    pub entities: Vec<Entity>,
}

/// Debt reported by a single financial institution for one month.
///
/// Only `situation` feeds the eligibility algorithm; the rest is carried
/// through for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Reporting institution name.
    #[serde(rename = "entidad")]
    pub name: String,
    /// Situation code: 1 = normal, higher = worse. Required; a payload
    /// missing it fails the fetch rather than defaulting.
    #[serde(rename = "situacion")]
    pub situation: u8,
    /// Date the debtor entered situation 1, when reported.
    #[serde(rename = "fechaSit1", default)]
    pub situation_date: Option<String>,
    /// Debt amount, in thousands of pesos.
    #[serde(rename = "monto")]
    pub amount: f64,
    /// Days past due.
    #[serde(rename = "diasAtrasoPago", default)]
    pub days_past_due: i64,
    /// Whether the debt was refinanced.
    #[serde(rename = "refinanciaciones", default)]
    pub refinanced: bool,
    /// Whether the debt is under judicial process.
    #[serde(rename = "procesoJud", default)]
    pub judicial_process: bool,
    /// Whether the classification is under review.
    #[serde(rename = "enRevision", default)]
    pub under_review: bool,
    /// Irrecoverable by technical disposition.
    #[serde(rename = "irrecDisposicionTecnica", default)]
    pub irrecoverable_technical: bool,
}

/// Historical debt record: up to 24 monthly periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Taxpayer identifier as echoed by the bureau.
    #[serde(rename = "identificacion")]
    pub identification: u64,
    /// Display name of the taxpayer.
    #[serde(rename = "denominacion")]
    pub denomination: String,
    /// Monthly periods, as returned by the bureau.
    #[serde(rename = "periodos", default)]
    pub periods: Vec<HistoricalPeriod>,
}

/// One month of the historical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPeriod {
    /// Year-month label, fixed-width `YYYYMM`.
    #[serde(rename = "periodo")]
    pub period: String,
    /// One entry per institution reporting debt this month.
    #[serde(rename = "entidades", default)]
    pub entities: Vec<HistoricalEntity>,
}

/// Reduced-fidelity entity entry carried by historical periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalEntity {
    /// Reporting institution name.
    #[serde(rename = "entidad")]
    pub name: String,
    /// Situation code: 1 = normal, higher = worse. Required.
    #[serde(rename = "situacion")]
    pub situation: u8,
    /// Debt amount, in thousands of pesos.
    #[serde(rename = "monto")]
    pub amount: f64,
    /// Whether the classification is under review.
    #[serde(rename = "enRevision", default)]
    pub under_review: bool,
    /// Whether the debt is under judicial process.
    #[serde(rename = "procesoJud", default)]
    pub judicial_process: bool,
}

// ============ Eligibility Verdict ============

/// The three eligibility outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    /// Qualifies for the loan intake wizard.
    #[serde(rename = "APTO")]
    Apto,
    /// Disqualified by at least one check.
    #[serde(rename = "NO_APTO")]
    NoApto,
    /// Indeterminate: insufficient bureau data for a full analysis.
    #[serde(rename = "PENDING")]
    Pending,
}

/// Structured result of one eligibility analysis.
///
/// Created fresh on every analysis call and never mutated afterwards. Not
/// persisted by this service; persistence is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    /// True iff no check failed.
    pub eligible: bool,
    /// APTO / NO_APTO / PENDING tag.
    pub status: EligibilityStatus,
    /// Worst situation of the most recent period, when history is present.
    pub current_situation: Option<u8>,
    /// Worst situation across the trailing 6 months, when any period
    /// falls inside that window.
    pub worst_last_6_months: Option<u8>,
    /// Worst situation across the trailing 12 months, when any period
    /// falls inside that window.
    pub worst_last_12_months: Option<u8>,
    /// Human-readable failure reasons, in check order. Empty iff eligible.
    pub reasons: Vec<String>,
    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

// ============ Assessment Response ============

/// Full pre-qualification answer for one taxpayer: verdict plus whatever
/// bureau records were obtained, in degraded mode if a fetch failed.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    /// Normalized CUIT the assessment ran against.
    pub cuit: String,
    /// Display name, when at least one record was retrieved.
    pub denomination: Option<String>,
    /// The eligibility verdict.
    pub verdict: EligibilityVerdict,
    /// Current-debt record, absent if that fetch failed.
    pub current: Option<DebtRecord>,
    /// Historical record, absent if that fetch failed.
    pub historical: Option<HistoricalRecord>,
    /// Response metadata.
    pub metadata: ResponseMetadata,
}

/// Assessment response metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    /// Which bureau sources answered ("bcra_current", "bcra_historical").
    pub sources: Vec<String>,
    /// True when at least one bureau fetch failed and the analysis ran on
    /// partial data.
    pub degraded: bool,
    /// Timestamp.
    pub timestamp: String,
}
