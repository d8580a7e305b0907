//! Escalation records
//!
//! Turns a triage verdict into the store actions that make it visible to
//! community health workers. Unknown patient fields get fixed defaults.

use crate::store::{
    Action, AlertKind, AlertRequest, CallRecord, CallSummary, MentalHealth, OutbreakReport,
    OutbreakStatus, Patient, PatientStatus, Sex, TranscriptLine,
};
use crate::triage::{Severity, Tag, Triage};
use chrono::{DateTime, Utc};

const INCOMING_LOCATION: &str = "Navrongo – Zone 4";
const CHOLERA_SIGNAL: &str = "Watery Diarrhea (suspected cholera)";
const CHOLERA_ZONE: &str = "Kassena-Nankana East";

fn incoming_patient(id: &str, name: &str) -> Patient {
    Patient {
        id: format!("incoming_{id}"),
        name: name.to_string(),
        sex: Sex::F,
        age: 60,
        dx: vec!["Undiagnosed".to_string()],
        risk: 99,
        status: PatientStatus::Critical,
        issue: String::new(),
        last_bp: "unknown".to_string(),
        last_glucose: None,
        pregnancy: false,
        location: INCOMING_LOCATION.to_string(),
        last_check: "Just now".to_string(),
        mental: MentalHealth::Unknown,
        phone: "—".to_string(),
    }
}

/// RAISE_ALERT for a USSD session that reached a critical screen
pub fn ussd_critical_alert(id: &str) -> Action {
    let patient = Patient {
        issue: "STROKE WARNING: sudden vision loss + headache".to_string(),
        ..incoming_patient(id, "Abena K. (Incoming)")
    };
    Action::RaiseAlert(AlertRequest {
        kind: AlertKind::Ussd,
        severity: Severity::Critical,
        message: "USSD critical flag (sudden severe symptom)".to_string(),
        tags: Default::default(),
        patient: Some(patient),
    })
}

/// Patient record synthesized for a voice caller
pub fn voice_patient(id: &str, triage: &Triage) -> Patient {
    let critical = triage.severity.is_critical();
    Patient {
        risk: if critical { 99 } else { 70 },
        status: PatientStatus::from(triage.severity),
        issue: if critical {
            "Critical flag via voice call"
        } else {
            "Warning flag via voice call"
        }
        .to_string(),
        pregnancy: triage.has(Tag::Pregnancy),
        ..incoming_patient(id, "Unknown Caller (Voice)")
    }
}

/// Actions emitted when a voice call closes: the call record, the alert, and
/// an outbreak signal when diarrhea was reported.
pub fn voice_call_actions(
    patient_id: &str,
    when: DateTime<Utc>,
    transcript: Vec<TranscriptLine>,
    triage: &Triage,
) -> Vec<Action> {
    let message = if triage.notes.is_empty() {
        "Voice triage: symptom".to_string()
    } else {
        format!("Voice triage: {}", triage.notes.join("; "))
    };

    let mut actions = vec![
        Action::AddCall(CallRecord {
            when,
            transcript,
            summary: CallSummary {
                severity: triage.severity,
                tags: triage.tags.clone(),
                notes: triage.notes.clone(),
            },
        }),
        Action::RaiseAlert(AlertRequest {
            kind: AlertKind::Voice,
            severity: triage.severity,
            message,
            tags: triage.tags.clone(),
            patient: Some(voice_patient(patient_id, triage)),
        }),
    ];
    if triage.has(Tag::Diarrhea) {
        actions.push(cholera_signal(1, "Last 15m"));
    }
    actions
}

/// FLAG_OUTBREAK for a suspected cholera cluster
pub fn cholera_signal(reports: u32, window: &str) -> Action {
    Action::FlagOutbreak(OutbreakReport {
        name: CHOLERA_SIGNAL.to_string(),
        zone: CHOLERA_ZONE.to_string(),
        reports,
        window: window.to_string(),
        status: OutbreakStatus::Watch,
    })
}
