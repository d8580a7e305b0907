//! Fixed bootstrap dataset loaded on first start and after a reset

use super::state::{
    Metrics, MentalHealth, Outbreak, OutbreakStatus, Patient, PatientStatus, Sex, StoreState,
};

/// Average stroke admission avoided by a critical intercept (USD)
pub const CRITICAL_COST_AVOIDED_USD: u64 = 211;

/// Cost avoided by any other early alert (USD)
pub const ROUTINE_COST_AVOIDED_USD: u64 = 35;

const BOOTSTRAP_ROUTINE_AVOIDED_USD: u64 = 140;

pub fn initial_patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "p1".into(),
            name: "Mrs. Adongo".into(),
            sex: Sex::F,
            age: 62,
            dx: vec!["Hypertension".into(), "Depression".into()],
            risk: 98,
            status: PatientStatus::Critical,
            issue: "Hypertensive Urgency: BP ≥180/120 with vision loss".into(),
            last_bp: "192/121".into(),
            last_glucose: None,
            pregnancy: false,
            location: "Navrongo Central (Zone 4)".into(),
            last_check: "10 min ago".into(),
            mental: MentalHealth::AtRisk,
            phone: "0240 123 456".into(),
        },
        Patient {
            id: "p2".into(),
            name: "Mr. Mensah".into(),
            sex: Sex::M,
            age: 58,
            dx: vec!["Type 2 Diabetes".into()],
            risk: 85,
            status: PatientStatus::Warning,
            issue: "Diabetic foot ulcer + fever → sepsis risk".into(),
            last_bp: "148/94".into(),
            last_glucose: Some("16.4 mmol/L".into()),
            pregnancy: false,
            location: "Bawku West".into(),
            last_check: "2 hrs ago".into(),
            mental: MentalHealth::Stable,
            phone: "0205 888 222".into(),
        },
        Patient {
            id: "p3".into(),
            name: "Amina Yussif".into(),
            sex: Sex::F,
            age: 45,
            dx: vec!["Hypertension".into()],
            risk: 30,
            status: PatientStatus::Stable,
            issue: "Routine adherence check".into(),
            last_bp: "136/88".into(),
            last_glucose: None,
            pregnancy: false,
            location: "Kassena North".into(),
            last_check: "1 day ago".into(),
            mental: MentalHealth::Stable,
            phone: "0541 888 333".into(),
        },
    ]
}

pub fn initial_metrics() -> Metrics {
    Metrics {
        enrolled: 20_250,
        weekly_checkins: 15_420,
        early_alerts: 64,
        crit_intercepted: 9,
        outbreaks_flagged: 1,
        program_cost_usd: 20_250,
        est_costs_avoided_usd: 9 * CRITICAL_COST_AVOIDED_USD + 6 * BOOTSTRAP_ROUTINE_AVOIDED_USD,
    }
}

pub fn initial_outbreaks() -> Vec<Outbreak> {
    vec![Outbreak {
        id: "o1".into(),
        name: "Watery Diarrhea (suspected cholera)".into(),
        zone: "Kassena-Nankana East".into(),
        reports: 3,
        window: "Last 1h".into(),
        status: OutbreakStatus::Watch,
    }]
}

pub fn initial_state() -> StoreState {
    StoreState {
        patients: initial_patients(),
        alerts: Vec::new(),
        calls: Vec::new(),
        dispatches: Vec::new(),
        metrics: initial_metrics(),
        outbreaks: initial_outbreaks(),
    }
}
