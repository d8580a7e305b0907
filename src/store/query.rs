//! Read-side helpers for the CHW dashboard

use super::action::DispatchRequest;
use super::state::{Alert, Patient, PatientStatus, StoreState};

pub fn critical_patient_count(state: &StoreState) -> usize {
    state
        .patients
        .iter()
        .filter(|p| p.status == PatientStatus::Critical)
        .count()
}

/// Alert a CHW answers when dispatching to `patient`.
///
/// Prefers an alert carrying this patient, then one whose message mentions the
/// patient's issue, then the newest alert.
pub fn find_alert_for_patient<'a>(alerts: &'a [Alert], patient: &Patient) -> Option<&'a Alert> {
    let issue = patient.issue.to_lowercase();
    alerts
        .iter()
        .find(|a| {
            a.patient.as_ref().is_some_and(|p| p.id == patient.id)
                || a.message.to_lowercase().contains(&issue)
        })
        .or_else(|| alerts.first())
}

/// Build a DISPATCH payload for a roster patient
pub fn dispatch_request_for(state: &StoreState, patient_id: &str) -> Option<DispatchRequest> {
    let patient = state.patient(patient_id)?;
    Some(DispatchRequest {
        alert_id: find_alert_for_patient(&state.alerts, patient).map(|a| a.id.clone()),
        patient_id: patient.id.clone(),
        zone: patient.location.clone(),
        reason: patient.issue.clone(),
    })
}
