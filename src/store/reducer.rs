//! Pure store transition function
//!
//! `reduce` never performs I/O and never fails. Ids and timestamps are
//! supplied by the caller through a [`Stamp`] so the same inputs always yield
//! the same snapshot.

use super::action::{
    Action, AlertRequest, CallRecord, DispatchRequest, OutbreakReport, ResolveRequest,
};
use super::bootstrap::{initial_state, CRITICAL_COST_AVOIDED_USD, ROUTINE_COST_AVOIDED_USD};
use super::state::{
    Alert, AlertStatus, Call, Dispatch, DispatchStatus, Outbreak, StoreState,
};
use chrono::{DateTime, Utc};

/// Identity and time assigned to records created by one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub id: String,
    pub at: DateTime<Utc>,
}

impl Stamp {
    pub fn new(id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { id: id.into(), at }
    }
}

/// Apply one action, producing a new snapshot
pub fn reduce(state: &StoreState, action: Action, stamp: &Stamp) -> StoreState {
    match action {
        Action::RaiseAlert(req) => raise_alert(state, req, stamp),
        Action::AddCall(record) => add_call(state, record, stamp),
        Action::Dispatch(req) => dispatch(state, req, stamp),
        Action::Resolve(req) => resolve(state, &req),
        Action::FlagOutbreak(report) => flag_outbreak(state, report, stamp),
        Action::ResetDemo => initial_state(),
        Action::Unknown => state.clone(),
    }
}

fn raise_alert(state: &StoreState, req: AlertRequest, stamp: &Stamp) -> StoreState {
    let mut next = state.clone();

    if let Some(patient) = &req.patient {
        if state.patient(&patient.id).is_none() {
            next.patients.insert(0, patient.clone());
        }
    }

    let critical = req.severity.is_critical();
    next.metrics.early_alerts += 1;
    if critical {
        next.metrics.crit_intercepted += 1;
        next.metrics.est_costs_avoided_usd += CRITICAL_COST_AVOIDED_USD;
    } else {
        next.metrics.est_costs_avoided_usd += ROUTINE_COST_AVOIDED_USD;
    }

    next.alerts.insert(
        0,
        Alert {
            id: stamp.id.clone(),
            kind: req.kind,
            severity: req.severity,
            message: req.message,
            tags: req.tags,
            patient: req.patient,
            created_at: stamp.at,
            status: AlertStatus::New,
        },
    );
    next
}

fn add_call(state: &StoreState, record: CallRecord, stamp: &Stamp) -> StoreState {
    let mut next = state.clone();
    next.calls.insert(
        0,
        Call {
            id: stamp.id.clone(),
            when: record.when,
            transcript: record.transcript,
            summary: record.summary,
        },
    );
    next
}

fn dispatch(state: &StoreState, req: DispatchRequest, stamp: &Stamp) -> StoreState {
    let mut next = state.clone();
    if let Some(alert_id) = &req.alert_id {
        advance_alert(&mut next, alert_id, AlertStatus::Dispatched);
    }
    next.dispatches.insert(
        0,
        Dispatch {
            id: stamp.id.clone(),
            alert_id: req.alert_id,
            patient_id: req.patient_id,
            zone: req.zone,
            reason: req.reason,
            created_at: stamp.at,
            status: DispatchStatus::Enroute,
        },
    );
    next
}

fn resolve(state: &StoreState, req: &ResolveRequest) -> StoreState {
    let mut next = state.clone();
    if let Some(alert_id) = &req.alert_id {
        advance_alert(&mut next, alert_id, AlertStatus::Resolved);
    }
    if let Some(dispatch_id) = &req.dispatch_id {
        match next.dispatches.iter_mut().find(|d| &d.id == dispatch_id) {
            Some(d) => d.status = DispatchStatus::Closed,
            None => tracing::debug!(dispatch_id = %dispatch_id, "Resolve references unknown dispatch"),
        }
    }
    next
}

fn flag_outbreak(state: &StoreState, report: OutbreakReport, stamp: &Stamp) -> StoreState {
    let mut next = state.clone();
    next.outbreaks.insert(
        0,
        Outbreak {
            id: stamp.id.clone(),
            name: report.name,
            zone: report.zone,
            reports: report.reports,
            window: report.window,
            status: report.status,
        },
    );
    next.metrics.outbreaks_flagged += 1;
    next
}

fn advance_alert(state: &mut StoreState, alert_id: &str, target: AlertStatus) {
    match state.alerts.iter_mut().find(|a| a.id == alert_id) {
        Some(alert) => alert.status = alert.status.advance(target),
        None => tracing::debug!(alert_id = %alert_id, "Action references unknown alert"),
    }
}
