//! Actions accepted by the Event Store

use super::state::{AlertKind, CallSummary, OutbreakStatus, Patient, TranscriptLine};
use crate::triage::{Severity, Tag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The closed set of store transitions.
///
/// Serialized as `{"type": "RAISE_ALERT", "payload": {...}}`. Any other `type`
/// deserializes to [`Action::Unknown`], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    RaiseAlert(AlertRequest),
    AddCall(CallRecord),
    Dispatch(DispatchRequest),
    Resolve(ResolveRequest),
    FlagOutbreak(OutbreakReport),
    ResetDemo,
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::RaiseAlert(_) => "RAISE_ALERT",
            Action::AddCall(_) => "ADD_CALL",
            Action::Dispatch(_) => "DISPATCH",
            Action::Resolve(_) => "RESOLVE",
            Action::FlagOutbreak(_) => "FLAG_OUTBREAK",
            Action::ResetDemo => "RESET_DEMO",
            Action::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRequest {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub patient: Option<Patient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub when: DateTime<Utc>,
    pub transcript: Vec<TranscriptLine>,
    pub summary: CallSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub alert_id: Option<String>,
    pub patient_id: String,
    pub zone: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub alert_id: Option<String>,
    pub dispatch_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakReport {
    pub name: String,
    pub zone: String,
    pub reports: u32,
    pub window: String,
    pub status: OutbreakStatus,
}
