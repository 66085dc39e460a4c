//! Eligibility analysis over bureau records.
//!
//! Pure and total: no I/O, no mutation of inputs, and every input — including
//! both records absent — maps to a verdict. Upstream fetch failures are the
//! caller's concern; it substitutes `None` for the failed record and the
//! analysis proceeds in degraded mode, answering PENDING when the data is
//! insufficient.

use crate::models::{
    DebtRecord, EligibilityStatus, EligibilityVerdict, HistoricalPeriod, HistoricalRecord,
};
use chrono::{Datelike, Days, Months, NaiveDate, Utc};

/// Maximum admissible situation for the most recent period.
const MAX_CURRENT_SITUATION: u8 = 1;
/// Maximum admissible situation across the trailing 6 months.
const MAX_LAST_6_MONTHS_SITUATION: u8 = 1;
/// Maximum admissible situation across the trailing 12 months.
const MAX_LAST_12_MONTHS_SITUATION: u8 = 2;

/// Analyzes the fetched bureau records against today's date.
pub fn analyze_debts(
    current: Option<&DebtRecord>,
    historical: Option<&HistoricalRecord>,
) -> EligibilityVerdict {
    analyze_debts_at(current, historical, Utc::now().date_naive())
}

/// Analyzes the fetched bureau records against an explicit reference date.
///
/// The month windows are anchored at the first of the reference month, and
/// a period exactly N months back is inside the N-month window.
pub fn analyze_debts_at(
    current: Option<&DebtRecord>,
    historical: Option<&HistoricalRecord>,
    reference: NaiveDate,
) -> EligibilityVerdict {
    if current.is_none() && historical.is_none() {
        return pending("Sin datos de la central de deudores para el análisis");
    }

    // The windowed checks need history; a current snapshot alone is not
    // enough to complete the analysis.
    let Some(historical) = historical else {
        return pending("Sin historial crediticio para completar el análisis");
    };

    // Labels are fixed-width YYYYMM, so lexicographic order is
    // chronological order.
    let mut periods: Vec<&HistoricalPeriod> = historical.periods.iter().collect();
    periods.sort_by(|a, b| b.period.cmp(&a.period));

    if periods.is_empty() {
        return pending("Sin períodos informados en el historial");
    }

    let mut reasons = Vec::new();

    let current_situation = worst_situation(periods[0]);
    if current_situation > MAX_CURRENT_SITUATION {
        reasons.push(format!(
            "Situación actual {} supera el máximo permitido ({})",
            current_situation, MAX_CURRENT_SITUATION
        ));
    }

    let worst_last_6_months = worst_in_window(&periods, reference, 6);
    if let Some(worst) = worst_last_6_months {
        if worst > MAX_LAST_6_MONTHS_SITUATION {
            reasons.push(format!(
                "Peor situación de los últimos 6 meses {} supera el máximo permitido ({})",
                worst, MAX_LAST_6_MONTHS_SITUATION
            ));
        }
    }

    let worst_last_12_months = worst_in_window(&periods, reference, 12);
    if let Some(worst) = worst_last_12_months {
        if worst > MAX_LAST_12_MONTHS_SITUATION {
            reasons.push(format!(
                "Peor situación de los últimos 12 meses {} supera el máximo permitido ({})",
                worst, MAX_LAST_12_MONTHS_SITUATION
            ));
        }
    }

    let eligible = reasons.is_empty();
    EligibilityVerdict {
        eligible,
        status: if eligible {
            EligibilityStatus::Apto
        } else {
            EligibilityStatus::NoApto
        },
        current_situation: Some(current_situation),
        worst_last_6_months,
        worst_last_12_months,
        reasons,
        analyzed_at: Utc::now(),
    }
}

/// Builds the insufficient-data verdict.
fn pending(reason: &str) -> EligibilityVerdict {
    EligibilityVerdict {
        eligible: false,
        status: EligibilityStatus::Pending,
        current_situation: None,
        worst_last_6_months: None,
        worst_last_12_months: None,
        reasons: vec![reason.to_string()],
        analyzed_at: Utc::now(),
    }
}

/// Worst (maximum) situation across a period's entities.
///
/// A period with no reported entities counts as 1: absence of reported debt
/// is not a risk signal.
fn worst_situation(period: &HistoricalPeriod) -> u8 {
    period
        .entities
        .iter()
        .map(|entity| entity.situation)
        .max()
        .unwrap_or(1)
}

/// Maximum worst-situation across the periods whose month falls within the
/// trailing `months` of the reference date, inclusive of the boundary month.
///
/// `None` when no period qualifies — the corresponding check is skipped,
/// not failed.
fn worst_in_window(
    periods: &[&HistoricalPeriod],
    reference: NaiveDate,
    months: u32,
) -> Option<u8> {
    let cutoff = month_floor(reference) - Months::new(months);
    periods
        .iter()
        .filter(|p| period_start(&p.period).is_some_and(|start| start >= cutoff))
        .map(|&p| worst_situation(p))
        .max()
}

/// First day of the month a `YYYYMM` label names, `None` for labels that do
/// not name a calendar month. Labels are validated at the bureau-client
/// boundary, so this is only a guard against misuse of the pure API.
fn period_start(label: &str) -> Option<NaiveDate> {
    let year: i32 = label.get(0..4)?.parse().ok()?;
    let month: u32 = label.get(4..6)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// First day of the given date's month.
fn month_floor(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}
