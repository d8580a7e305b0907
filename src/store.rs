//! Event Store
//!
//! Single source of truth for patients, alerts, calls, dispatches, outbreaks
//! and metrics. Actions are applied one at a time through the pure
//! [`reduce`] function; every resulting snapshot is written through to the
//! persistence collaborator before it becomes visible.

pub mod action;
pub mod bootstrap;
mod metrics;
pub mod query;
mod reducer;
pub mod state;

#[cfg(test)]
mod proptests;

pub use action::{
    Action, AlertRequest, CallRecord, OutbreakReport, ResolveRequest,
};
pub use metrics::PayerSummary;
pub use reducer::{reduce, Stamp};
pub use state::*;

use crate::runtime::{PersistError, Persistence, StoreKey};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;

/// Generate a collision-resistant record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Notifications sent to store subscribers
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Applied {
        action: &'static str,
        snapshot: Arc<StoreState>,
    },
    PersistenceFailed {
        key: Option<StoreKey>,
        message: String,
    },
}

/// Shared, single-writer store handle
pub struct EventStore<P: Persistence> {
    persistence: P,
    state: Mutex<Arc<StoreState>>,
    events_tx: broadcast::Sender<StoreEvent>,
}

impl<P: Persistence> EventStore<P> {
    /// Load the last persisted snapshot, filling gaps from the bootstrap dataset
    pub fn open(persistence: P) -> Self {
        let state = load_snapshot(&persistence);
        tracing::info!(
            patients = state.patients.len(),
            alerts = state.alerts.len(),
            dispatches = state.dispatches.len(),
            "Event store loaded"
        );
        let (events_tx, _) = broadcast::channel(64);
        Self {
            persistence,
            state: Mutex::new(Arc::new(state)),
            events_tx,
        }
    }

    /// Current snapshot. Snapshots are immutable; later actions produce new ones.
    pub fn snapshot(&self) -> Arc<StoreState> {
        Arc::clone(&self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events_tx.subscribe()
    }

    #[allow(dead_code)] // Used in tests
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Apply an action and write the result through to persistence.
    ///
    /// Never fails: a persistence error is logged and broadcast, and the
    /// in-memory transition still stands.
    pub fn dispatch(&self, action: Action) -> Arc<StoreState> {
        let kind = action.kind();
        let mut current = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if matches!(action, Action::Unknown) {
            tracing::debug!("Ignoring unknown store action");
            return Arc::clone(&current);
        }
        let resets = matches!(action, Action::ResetDemo);

        let stamp = Stamp::new(new_id(), Utc::now());
        let next = Arc::new(reduce(&current, action, &stamp));

        if resets {
            if let Err(e) = self.persistence.clear() {
                self.report_failure(None, &e);
            }
        } else {
            self.persist(&next);
        }

        *current = Arc::clone(&next);
        tracing::info!(action = kind, record_id = %stamp.id, "Applied store action");
        let _ = self.events_tx.send(StoreEvent::Applied {
            action: kind,
            snapshot: Arc::clone(&next),
        });
        next
    }

    /// Write all six blobs as one snapshot, so a restart never sees a mix
    /// of old and new keys.
    fn persist(&self, state: &StoreState) {
        let result = StoreKey::ALL
            .into_iter()
            .map(|key| encode(state, key).map(|blob| (key, blob)))
            .collect::<Result<Vec<_>, _>>()
            .and_then(|blobs| self.persistence.save_all(&blobs));
        if let Err(e) = result {
            let key = match &e {
                PersistError::Encode { key, .. } => Some(*key),
                PersistError::Backend(_) => None,
            };
            self.report_failure(key, &e);
        }
    }

    fn report_failure(&self, key: Option<StoreKey>, error: &PersistError) {
        tracing::error!(key = ?key, error = %error, "Failed to persist store snapshot");
        let _ = self.events_tx.send(StoreEvent::PersistenceFailed {
            key,
            message: error.to_string(),
        });
    }
}

fn encode(state: &StoreState, key: StoreKey) -> Result<String, PersistError> {
    let encoded = match key {
        StoreKey::Patients => serde_json::to_string(&state.patients),
        StoreKey::Alerts => serde_json::to_string(&state.alerts),
        StoreKey::Calls => serde_json::to_string(&state.calls),
        StoreKey::Dispatches => serde_json::to_string(&state.dispatches),
        StoreKey::Metrics => serde_json::to_string(&state.metrics),
        StoreKey::Outbreaks => serde_json::to_string(&state.outbreaks),
    };
    encoded.map_err(|source| PersistError::Encode { key, source })
}

fn load_snapshot(persistence: &impl Persistence) -> StoreState {
    StoreState {
        patients: load_blob(persistence, StoreKey::Patients, bootstrap::initial_patients),
        alerts: load_blob(persistence, StoreKey::Alerts, Vec::new),
        calls: load_blob(persistence, StoreKey::Calls, Vec::new),
        dispatches: load_blob(persistence, StoreKey::Dispatches, Vec::new),
        metrics: load_blob(persistence, StoreKey::Metrics, bootstrap::initial_metrics),
        outbreaks: load_blob(persistence, StoreKey::Outbreaks, bootstrap::initial_outbreaks),
    }
}

fn load_blob<T: DeserializeOwned>(
    persistence: &impl Persistence,
    key: StoreKey,
    fallback: impl FnOnce() -> T,
) -> T {
    match persistence.load(key) {
        Ok(Some(blob)) => serde_json::from_str(&blob).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Discarding unreadable blob");
            fallback()
        }),
        Ok(None) => fallback(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to load blob");
            fallback()
        }
    }
}
