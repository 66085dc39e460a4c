/// Unit tests for the eligibility analysis
/// Tests the PENDING outcomes, the date-windowed checks, and verdict invariants
use chrono::NaiveDate;
use rust_bcra_api::core::eligibility::analyze_debts_at;
use rust_bcra_api::core::models::{
    DebtRecord, EligibilityStatus, Entity, HistoricalEntity, HistoricalPeriod, HistoricalRecord,
    Period,
};

fn entity(situation: u8) -> HistoricalEntity {
    HistoricalEntity {
        name: "BANCO DE PRUEBA S.A.".to_string(),
        situation,
        amount: 320.0,
        under_review: false,
        judicial_process: false,
    }
}

fn period(label: &str, situations: &[u8]) -> HistoricalPeriod {
    HistoricalPeriod {
        period: label.to_string(),
        entities: situations.iter().copied().map(entity).collect(),
    }
}

fn history(periods: Vec<HistoricalPeriod>) -> HistoricalRecord {
    HistoricalRecord {
        identification: 20123456786,
        denomination: "PEREZ JUAN CARLOS".to_string(),
        periods,
    }
}

fn current_snapshot(situations: &[u8]) -> DebtRecord {
    DebtRecord {
        identification: 20123456786,
        denomination: "PEREZ JUAN CARLOS".to_string(),
        periods: vec![Period {
            period: "202403".to_string(),
            entities: situations
                .iter()
                .map(|&s| Entity {
                    name: "BANCO DE PRUEBA S.A.".to_string(),
                    situation: s,
                    situation_date: None,
                    amount: 320.0,
                    days_past_due: 0,
                    refinanced: false,
                    judicial_process: false,
                    under_review: false,
                    irrecoverable_technical: false,
                })
                .collect(),
        }],
    }
}

fn march_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

#[cfg(test)]
mod pending_outcomes {
    use super::*;

    #[test]
    fn no_data_at_all_is_pending() {
        let verdict = analyze_debts_at(None, None, march_2024());

        assert!(!verdict.eligible);
        assert_eq!(verdict.status, EligibilityStatus::Pending);
        assert_eq!(verdict.current_situation, None);
        assert_eq!(verdict.worst_last_6_months, None);
        assert_eq!(verdict.worst_last_12_months, None);
        assert!(!verdict.reasons.is_empty());
    }

    #[test]
    fn current_without_history_is_pending() {
        // Even a spotless current snapshot is not enough without history.
        let current = current_snapshot(&[1]);
        let verdict = analyze_debts_at(Some(&current), None, march_2024());
        assert_eq!(verdict.status, EligibilityStatus::Pending);

        // And a terrible one changes nothing either.
        let current = current_snapshot(&[5, 4]);
        let verdict = analyze_debts_at(Some(&current), None, march_2024());
        assert_eq!(verdict.status, EligibilityStatus::Pending);
        assert_eq!(verdict.current_situation, None);
    }

    #[test]
    fn history_without_periods_is_pending() {
        let record = history(vec![]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());

        assert!(!verdict.eligible);
        assert_eq!(verdict.status, EligibilityStatus::Pending);
        assert!(!verdict.reasons.is_empty());
    }

    #[test]
    fn any_period_resolves_past_pending() {
        // Past the period-presence check the status is APTO or NO_APTO,
        // never PENDING.
        let record = history(vec![period("202402", &[4])]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());
        assert_ne!(verdict.status, EligibilityStatus::Pending);
    }
}

#[cfg(test)]
mod window_checks {
    use super::*;

    #[test]
    fn six_month_window_failure() {
        // Most recent period is clean, but December 2023 carries a 3:
        // inside the 6-month window, above the ≤1 threshold.
        let record = history(vec![period("202401", &[1]), period("202312", &[2, 3])]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());

        assert_eq!(verdict.current_situation, Some(1));
        assert_eq!(verdict.worst_last_6_months, Some(3));
        assert_eq!(verdict.status, EligibilityStatus::NoApto);
        assert!(!verdict.eligible);
        assert!(verdict.reasons.iter().any(|r| r.contains("6 meses")));
    }

    #[test]
    fn clean_year_is_apto() {
        let record = history(vec![
            period("202403", &[1]),
            period("202402", &[1, 1]),
            period("202312", &[1]),
            period("202309", &[]),
            period("202304", &[1]),
        ]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());

        assert!(verdict.eligible);
        assert_eq!(verdict.status, EligibilityStatus::Apto);
        assert_eq!(verdict.current_situation, Some(1));
        assert_eq!(verdict.worst_last_6_months, Some(1));
        assert_eq!(verdict.worst_last_12_months, Some(1));
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn current_period_failure() {
        let record = history(vec![period("202403", &[2])]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());

        assert_eq!(verdict.current_situation, Some(2));
        assert_eq!(verdict.status, EligibilityStatus::NoApto);
        assert!(verdict.reasons.iter().any(|r| r.contains("actual")));
    }

    #[test]
    fn twelve_month_window_uses_looser_threshold() {
        let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        // A 2 nine months back: outside the 6-month window, inside the
        // 12-month one, and within its ≤2 threshold.
        let record = history(vec![period("202406", &[1]), period("202309", &[2])]);
        let verdict = analyze_debts_at(None, Some(&record), reference);
        assert!(verdict.eligible);
        assert_eq!(verdict.worst_last_6_months, Some(1));
        assert_eq!(verdict.worst_last_12_months, Some(2));

        // A 3 in the same spot crosses it.
        let record = history(vec![period("202406", &[1]), period("202309", &[3])]);
        let verdict = analyze_debts_at(None, Some(&record), reference);
        assert_eq!(verdict.status, EligibilityStatus::NoApto);
        assert_eq!(verdict.worst_last_12_months, Some(3));
        assert!(verdict.reasons.iter().any(|r| r.contains("12 meses")));
    }

    #[test]
    fn stale_history_checks_only_the_most_recent_period() {
        // Every period predates both windows: the window fields stay None
        // and only the current check runs, on the most recent stale period.
        let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let record = history(vec![period("202201", &[5]), period("202112", &[1])]);
        let verdict = analyze_debts_at(None, Some(&record), reference);

        assert_eq!(verdict.current_situation, Some(5));
        assert_eq!(verdict.worst_last_6_months, None);
        assert_eq!(verdict.worst_last_12_months, None);
        assert_eq!(verdict.status, EligibilityStatus::NoApto);
        assert!(verdict.reasons.iter().any(|r| r.contains("actual")));
    }

    #[test]
    fn entity_less_periods_count_as_normal() {
        let record = history(vec![period("202403", &[]), period("202402", &[])]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());

        assert_eq!(verdict.current_situation, Some(1));
        assert_eq!(verdict.worst_last_6_months, Some(1));
        assert!(verdict.eligible);
    }

    #[test]
    fn duplicate_period_labels_both_feed_the_window_max() {
        let record = history(vec![
            period("202403", &[1]),
            period("202402", &[1]),
            period("202402", &[4]),
        ]);
        let verdict = analyze_debts_at(None, Some(&record), march_2024());

        assert_eq!(verdict.worst_last_6_months, Some(4));
        assert_eq!(verdict.status, EligibilityStatus::NoApto);
    }
}

#[cfg(test)]
mod verdict_invariants {
    use super::*;

    #[test]
    fn input_order_does_not_change_the_selected_period() {
        let forward = history(vec![
            period("202403", &[1]),
            period("202402", &[3]),
            period("202311", &[2]),
        ]);
        let reversed = history(vec![
            period("202311", &[2]),
            period("202402", &[3]),
            period("202403", &[1]),
        ]);

        let a = analyze_debts_at(None, Some(&forward), march_2024());
        let b = analyze_debts_at(None, Some(&reversed), march_2024());

        assert_eq!(a.current_situation, b.current_situation);
        assert_eq!(a.worst_last_6_months, b.worst_last_6_months);
        assert_eq!(a.worst_last_12_months, b.worst_last_12_months);
        assert_eq!(a.status, b.status);
    }

    #[test]
    fn analysis_is_idempotent_apart_from_the_timestamp() {
        let current = current_snapshot(&[1]);
        let record = history(vec![period("202402", &[2]), period("202312", &[1])]);

        let a = analyze_debts_at(Some(&current), Some(&record), march_2024());
        let b = analyze_debts_at(Some(&current), Some(&record), march_2024());

        assert_eq!(a.eligible, b.eligible);
        assert_eq!(a.status, b.status);
        assert_eq!(a.current_situation, b.current_situation);
        assert_eq!(a.worst_last_6_months, b.worst_last_6_months);
        assert_eq!(a.worst_last_12_months, b.worst_last_12_months);
        assert_eq!(a.reasons, b.reasons);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let record = history(vec![period("202312", &[2]), period("202403", &[1])]);
        let before: Vec<String> = record.periods.iter().map(|p| p.period.clone()).collect();

        let _ = analyze_debts_at(None, Some(&record), march_2024());

        let after: Vec<String> = record.periods.iter().map(|p| p.period.clone()).collect();
        assert_eq!(before, after);
    }
}
