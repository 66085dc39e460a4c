//! Presentation helpers for bureau data.
//!
//! Mapping from situation codes to advisor-facing labels, period-label
//! formatting, and currency formatting. These carry no decision logic; the
//! eligibility analysis never consults them.

/// Advisor-facing description of a BCRA situation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SituationInfo {
    /// The numeric code as reported by the bureau.
    pub code: u8,
    /// Short label.
    pub label: &'static str,
    /// Longer description of the classification.
    pub description: &'static str,
    /// Display color hint.
    pub color: &'static str,
}

/// Maps a situation code to its BCRA debtor classification.
///
/// Unknown codes get a neutral fallback rather than an error; the bureau
/// has extended the scale before.
pub fn situation_info(code: u8) -> SituationInfo {
    match code {
        1 => SituationInfo {
            code,
            label: "Normal",
            description: "Atraso en el pago que no supera los 31 días",
            color: "green",
        },
        2 => SituationInfo {
            code,
            label: "Seguimiento especial",
            description: "Atraso en el pago de más de 31 y hasta 90 días",
            color: "yellow",
        },
        3 => SituationInfo {
            code,
            label: "Con problemas",
            description: "Atraso en el pago de más de 90 y hasta 180 días",
            color: "orange",
        },
        4 => SituationInfo {
            code,
            label: "Alto riesgo de insolvencia",
            description: "Atraso en el pago de más de 180 días y hasta un año",
            color: "red",
        },
        5 => SituationInfo {
            code,
            label: "Irrecuperable",
            description: "Atraso en el pago superior a un año",
            color: "darkred",
        },
        6 => SituationInfo {
            code,
            label: "Irrecuperable por disposición técnica",
            description: "Deuda con entidad en liquidación o revocada",
            color: "darkred",
        },
        _ => SituationInfo {
            code,
            label: "Desconocida",
            description: "Clasificación no catalogada",
            color: "gray",
        },
    }
}

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Formats a `YYYYMM` period label as "Mes Año" for display.
///
/// Labels that do not name a calendar month are returned verbatim.
pub fn format_period(label: &str) -> String {
    let month: Option<usize> = label.get(4..6).and_then(|m| m.parse().ok());
    match (label.get(0..4), month) {
        (Some(year), Some(month)) if (1..=12).contains(&month) && label.len() == 6 => {
            format!("{} {}", MONTH_NAMES[month - 1], year)
        }
        _ => label.to_string(),
    }
}

/// Formats a bureau amount as Argentine pesos.
///
/// The bureau reports amounts in thousands of pesos, so the value is
/// multiplied by 1000 before grouping digits.
pub fn format_amount_ars(amount_thousands: f64) -> String {
    let pesos = (amount_thousands * 1000.0).round() as i64;
    let digits = pesos.abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if pesos < 0 {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}
