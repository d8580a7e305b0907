//! Derived payer metrics, computed on read and never stored

use super::query::critical_patient_count;
use super::state::{Metrics, StoreState};

impl Metrics {
    /// Return on investment as a percentage of program cost
    #[allow(clippy::cast_precision_loss)] // counters stay far below 2^52
    pub fn roi_percent(&self) -> f64 {
        if self.program_cost_usd == 0 {
            return 0.0;
        }
        let avoided = self.est_costs_avoided_usd as f64;
        let cost = self.program_cost_usd as f64;
        (avoided - cost) / cost * 100.0
    }
}

/// Payer dashboard figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayerSummary {
    pub metrics: Metrics,
    pub roi_percent: f64,
    pub critical_patients: usize,
    pub active_outbreaks: usize,
}

impl PayerSummary {
    pub fn from_state(state: &StoreState) -> Self {
        Self {
            metrics: state.metrics,
            roi_percent: state.metrics.roi_percent(),
            critical_patients: critical_patient_count(state),
            active_outbreaks: state.outbreaks.len(),
        }
    }
}
