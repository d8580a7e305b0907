//! Property-based tests for the store reducer
//!
//! Random action sequences must keep counters monotonic, alert status
//! forward-only, and the patient roster free of duplicates.

use super::action::DispatchRequest;
use super::bootstrap::initial_state;
use super::*;
use crate::triage::Severity;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Warning),
        Just(Severity::Critical),
    ]
}

/// Small id space so actions collide with existing records
fn arb_ref() -> impl Strategy<Value = Option<String>> {
    proptest::option::of((0u8..6).prop_map(|n| format!("r{n}")))
}

fn arb_patient() -> impl Strategy<Value = Option<Patient>> {
    proptest::option::of((0u8..4).prop_map(|n| {
        let mut p = bootstrap::initial_patients().remove(0);
        p.id = format!("incoming_{n}");
        p
    }))
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (arb_severity(), arb_patient()).prop_map(|(severity, patient)| {
            Action::RaiseAlert(AlertRequest {
                kind: AlertKind::Voice,
                severity,
                message: "generated".into(),
                tags: Default::default(),
                patient,
            })
        }),
        2 => arb_ref().prop_map(|alert_id| {
            Action::Dispatch(DispatchRequest {
                alert_id,
                patient_id: "p1".into(),
                zone: "z".into(),
                reason: "r".into(),
            })
        }),
        2 => (arb_ref(), arb_ref()).prop_map(|(alert_id, dispatch_id)| {
            Action::Resolve(ResolveRequest { alert_id, dispatch_id })
        }),
        1 => (1u32..5).prop_map(|reports| {
            Action::FlagOutbreak(OutbreakReport {
                name: "cluster".into(),
                zone: "z".into(),
                reports,
                window: "Last 15m".into(),
                status: OutbreakStatus::Watch,
            })
        }),
        1 => Just(Action::Unknown),
    ]
}

fn run(actions: Vec<Action>) -> Vec<(Action, StoreState, StoreState)> {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let mut state = initial_state();
    let mut steps = Vec::new();
    for (i, action) in actions.into_iter().enumerate() {
        let stamp = Stamp::new(format!("r{i}"), at);
        let next = reduce(&state, action.clone(), &stamp);
        steps.push((action, state, next.clone()));
        state = next;
    }
    steps
}

proptest! {
    #[test]
    fn metrics_never_decrease(actions in proptest::collection::vec(arb_action(), 0..30)) {
        for (_, before, after) in run(actions) {
            let (b, a) = (before.metrics, after.metrics);
            prop_assert!(a.early_alerts >= b.early_alerts);
            prop_assert!(a.crit_intercepted >= b.crit_intercepted);
            prop_assert!(a.est_costs_avoided_usd >= b.est_costs_avoided_usd);
            prop_assert!(a.outbreaks_flagged >= b.outbreaks_flagged);
            prop_assert_eq!(a.enrolled, b.enrolled);
            prop_assert_eq!(a.program_cost_usd, b.program_cost_usd);
        }
    }

    #[test]
    fn early_alerts_count_raise_actions(actions in proptest::collection::vec(arb_action(), 0..30)) {
        let raised = actions.iter().filter(|a| matches!(a, Action::RaiseAlert(_))).count() as u64;
        let critical = actions
            .iter()
            .filter(|a| matches!(a, Action::RaiseAlert(r) if r.severity == Severity::Critical))
            .count() as u64;
        let last = run(actions).pop().map_or_else(initial_state, |(_, _, s)| s);
        let base = initial_state().metrics;
        prop_assert_eq!(last.metrics.early_alerts, base.early_alerts + raised);
        prop_assert_eq!(last.metrics.crit_intercepted, base.crit_intercepted + critical);
        prop_assert_eq!(
            last.metrics.est_costs_avoided_usd,
            base.est_costs_avoided_usd + critical * 211 + (raised - critical) * 35
        );
    }

    #[test]
    fn alert_status_is_forward_only(actions in proptest::collection::vec(arb_action(), 0..30)) {
        for (_, before, after) in run(actions) {
            for alert in &before.alerts {
                let now = after.alert(&alert.id).map(|a| a.status);
                prop_assert!(now.is_some(), "alert {} disappeared", alert.id);
                prop_assert!(now.unwrap() >= alert.status);
            }
        }
    }

    #[test]
    fn patient_ids_stay_unique(actions in proptest::collection::vec(arb_action(), 0..30)) {
        for (_, _, after) in run(actions) {
            let ids: HashSet<_> = after.patients.iter().map(|p| p.id.as_str()).collect();
            prop_assert_eq!(ids.len(), after.patients.len());
        }
    }

    #[test]
    fn unknown_is_identity(actions in proptest::collection::vec(arb_action(), 0..10)) {
        for (action, before, after) in run(actions) {
            if action == Action::Unknown {
                prop_assert_eq!(before, after);
            }
        }
    }
}
