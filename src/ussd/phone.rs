//! Handset driver: runs transitions and executes their effects

use super::effect::Effect;
use super::menu::StepId;
use super::state::{Key, UssdState};
use super::transition::transition;
use crate::escalation;
use crate::runtime::Persistence;
use crate::store::{new_id, EventStore};
use std::sync::Arc;
use std::time::Duration;

/// What the handset shows after a keypress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub step: StepId,
    pub text: String,
    pub input: String,
    /// Transient notice and how long to show it
    pub notice: Option<(&'static str, Duration)>,
    /// Id of the alert raised by this keypress, if any
    pub raised_alert: Option<String>,
}

/// One simulated feature phone bound to the shared store
pub struct UssdPhone<P: Persistence> {
    state: UssdState,
    caller: String,
    store: Arc<EventStore<P>>,
}

impl<P: Persistence> UssdPhone<P> {
    pub fn new(store: Arc<EventStore<P>>, caller: impl Into<String>) -> Self {
        Self {
            state: UssdState::new(),
            caller: caller.into(),
            store,
        }
    }

    pub fn state(&self) -> &UssdState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        Screen {
            step: self.state.step,
            text: self.state.step.screen_text(&self.caller),
            input: self.state.input.clone(),
            notice: None,
            raised_alert: None,
        }
    }

    pub fn press(&mut self, key: Key) -> Screen {
        let result = transition(&self.state, key);
        self.state = result.new_state;

        let mut screen = self.screen();
        for effect in result.effects {
            match effect {
                Effect::Notice { text, ttl } => {
                    tracing::debug!(step = ?self.state.step, "Rejected USSD selection");
                    screen.notice = Some((text, ttl));
                }
                Effect::Escalate => {
                    let snapshot = self.store.dispatch(escalation::ussd_critical_alert(&new_id()));
                    let alert_id = snapshot.alerts.first().map(|a| a.id.clone());
                    tracing::info!(alert_id = ?alert_id, "USSD session escalated");
                    screen.raised_alert = alert_id;
                }
                Effect::SessionClosed { risk } => {
                    tracing::info!(risk = ?risk, "USSD session closed");
                }
            }
        }
        screen
    }
}
