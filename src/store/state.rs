//! Event Store snapshot types
//!
//! Field names serialize in the camelCase shape the dashboards read.

use crate::triage::{Severity, Tag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    F,
    M,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    Stable,
    Warning,
    Critical,
}

impl From<Severity> for PatientStatus {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => PatientStatus::Stable,
            Severity::Warning => PatientStatus::Warning,
            Severity::Critical => PatientStatus::Critical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MentalHealth {
    Stable,
    #[serde(rename = "At Risk")]
    AtRisk,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub sex: Sex,
    pub age: u32,
    /// Diagnosis labels, most significant first
    pub dx: Vec<String>,
    /// Risk score, 0-100
    pub risk: u8,
    pub status: PatientStatus,
    pub issue: String,
    #[serde(rename = "lastBP")]
    pub last_bp: String,
    pub last_glucose: Option<String>,
    pub pregnancy: bool,
    pub location: String,
    pub last_check: String,
    pub mental: MentalHealth,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Ussd,
    Voice,
    Manual,
}

/// Alert lifecycle. Ordered so that status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    New,
    Dispatched,
    Resolved,
}

impl AlertStatus {
    /// Move toward `target`, never backwards
    pub fn advance(self, target: AlertStatus) -> AlertStatus {
        self.max(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    pub created_at: DateTime<Utc>,
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Patient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub role: Role,
    pub text: String,
}

impl TranscriptLine {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn patient(text: impl Into<String>) -> Self {
        Self {
            role: Role::Patient,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSummary {
    pub severity: Severity,
    pub tags: BTreeSet<Tag>,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub id: String,
    pub when: DateTime<Utc>,
    pub transcript: Vec<TranscriptLine>,
    pub summary: CallSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    Enroute,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: String,
    /// Alert being answered; absent when no alert could be matched
    pub alert_id: Option<String>,
    pub patient_id: String,
    pub zone: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub status: DispatchStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutbreakStatus {
    Watch,
    Contained,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbreak {
    pub id: String,
    pub name: String,
    pub zone: String,
    pub reports: u32,
    pub window: String,
    pub status: OutbreakStatus,
}

/// Population counters. Only reducer actions change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub enrolled: u64,
    pub weekly_checkins: u64,
    pub early_alerts: u64,
    pub crit_intercepted: u64,
    pub outbreaks_flagged: u64,
    #[serde(rename = "programCostUSD")]
    pub program_cost_usd: u64,
    #[serde(rename = "estCostsAvoidedUSD")]
    pub est_costs_avoided_usd: u64,
}

/// Complete Event Store snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub patients: Vec<Patient>,
    pub alerts: Vec<Alert>,
    pub calls: Vec<Call>,
    pub dispatches: Vec<Dispatch>,
    pub metrics: Metrics,
    pub outbreaks: Vec<Outbreak>,
}

impl StoreState {
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn alert(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn dispatch(&self, id: &str) -> Option<&Dispatch> {
        self.dispatches.iter().find(|d| d.id == id)
    }
}
