//! Quick demo scenarios
//!
//! Canned escalations the operator can fire without walking a USSD or voice
//! flow. Each scenario reuses a fixed patient id, so repeated runs update the
//! same patient instead of adding a new one.

use crate::escalation::cholera_signal;
use crate::store::{Action, AlertKind, AlertRequest, MentalHealth, Patient, PatientStatus, Sex};
use crate::triage::Severity;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Stroke,
    FootSepsis,
    Preeclampsia,
    CholeraCluster,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown scenario '{0}' (expected stroke, foot, pree or cholera)")]
pub struct ScenarioParseError(String);

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Stroke,
        Scenario::FootSepsis,
        Scenario::Preeclampsia,
        Scenario::CholeraCluster,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Stroke => "stroke",
            Scenario::FootSepsis => "foot",
            Scenario::Preeclampsia => "pree",
            Scenario::CholeraCluster => "cholera",
        }
    }

    /// Operator notification shown once the scenario has run
    pub fn headline(self) -> &'static str {
        match self {
            Scenario::Stroke => "Critical voice alert (stroke red flags) → CHW dashboard updated",
            Scenario::FootSepsis => "Critical USSD alert (foot sepsis) → CHW dashboard updated",
            Scenario::Preeclampsia => {
                "Critical voice alert (preeclampsia suspicion) → CHW dashboard updated"
            }
            Scenario::CholeraCluster => {
                "Outbreak signal (watery diarrhea cluster) → Payer dashboard updated"
            }
        }
    }

    pub fn actions(self) -> Vec<Action> {
        match self {
            Scenario::Stroke => vec![critical_alert(
                AlertKind::Voice,
                "Voice: stroke red flags",
                Patient {
                    id: "pX1".to_string(),
                    name: "Grace Atanga".to_string(),
                    sex: Sex::F,
                    age: 66,
                    dx: vec!["Hypertension".to_string()],
                    risk: 99,
                    status: PatientStatus::Critical,
                    issue: "Stroke red flags: sudden vision loss + severe headache".to_string(),
                    last_bp: "196/124".to_string(),
                    last_glucose: None,
                    pregnancy: false,
                    location: "Navrongo Central".to_string(),
                    last_check: "Just now".to_string(),
                    mental: MentalHealth::Unknown,
                    phone: "—".to_string(),
                },
            )],
            Scenario::FootSepsis => vec![critical_alert(
                AlertKind::Ussd,
                "USSD: Foot wound + fever",
                Patient {
                    id: "pX2".to_string(),
                    name: "Mr. Alhassan".to_string(),
                    sex: Sex::M,
                    age: 59,
                    dx: vec!["Type 2 Diabetes".to_string()],
                    risk: 92,
                    status: PatientStatus::Critical,
                    issue: "Foot ulcer with fever (sepsis risk)".to_string(),
                    last_bp: "150/92".to_string(),
                    last_glucose: Some("17.2 mmol/L".to_string()),
                    pregnancy: false,
                    location: "Bawku West".to_string(),
                    last_check: "Just now".to_string(),
                    mental: MentalHealth::Stable,
                    phone: "—".to_string(),
                },
            )],
            Scenario::Preeclampsia => vec![critical_alert(
                AlertKind::Voice,
                "Voice: preeclampsia suspicion",
                Patient {
                    id: "pX3".to_string(),
                    name: "Zuera Yakubu (Pregnant)".to_string(),
                    sex: Sex::F,
                    age: 29,
                    dx: vec!["Pregnancy".to_string(), "Hypertension?".to_string()],
                    risk: 95,
                    status: PatientStatus::Critical,
                    issue: "Severe headache + vision changes in pregnancy (preeclampsia)"
                        .to_string(),
                    last_bp: "172/110".to_string(),
                    last_glucose: None,
                    pregnancy: true,
                    location: "Kassena North".to_string(),
                    last_check: "Just now".to_string(),
                    mental: MentalHealth::Unknown,
                    phone: "—".to_string(),
                },
            )],
            Scenario::CholeraCluster => vec![cholera_signal(3, "Last 1h")],
        }
    }
}

fn critical_alert(kind: AlertKind, message: &str, patient: Patient) -> Action {
    Action::RaiseAlert(AlertRequest {
        kind,
        severity: Severity::Critical,
        message: message.to_string(),
        tags: Default::default(),
        patient: Some(patient),
    })
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stroke" => Ok(Scenario::Stroke),
            "foot" | "sepsis" => Ok(Scenario::FootSepsis),
            "pree" | "preeclampsia" => Ok(Scenario::Preeclampsia),
            "cholera" => Ok(Scenario::CholeraCluster),
            _ => Err(ScenarioParseError(s.to_string())),
        }
    }
}
