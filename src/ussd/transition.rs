//! Pure USSD transition function
//!
//! Given the same state and key this always produces the same result, with no
//! I/O. Invalid selections are not errors: they leave the screen unchanged,
//! clear the input and emit a notice.

use super::effect::Effect;
use super::menu::Risk;
use super::state::{Key, UssdState};

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: UssdState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: UssdState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

pub fn transition(state: &UssdState, key: Key) -> TransitionResult {
    match key {
        Key::Clear => TransitionResult::new(state.cleared()),
        Key::Send => submit(state),
        typed => match typed.typed_char() {
            Some(c) => TransitionResult::new(state.with_typed(c)),
            None => TransitionResult::new(state.clone()),
        },
    }
}

fn submit(state: &UssdState) -> TransitionResult {
    let step = state.step.step();

    // A finished session: SEND dials in again
    if step.is_terminal() {
        return TransitionResult::new(UssdState::new());
    }

    let choice = state
        .input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|c| step.options.contains(c));
    let Some(next) = choice.and_then(|c| step.next_for(c)) else {
        return TransitionResult::new(state.cleared()).with_effect(Effect::invalid_option());
    };

    let mut result = TransitionResult::new(UssdState::at(next));
    if let Some(risk) = next.step().end_risk {
        if risk == Risk::Critical {
            result = result.with_effect(Effect::Escalate);
        }
        result = result.with_effect(Effect::SessionClosed { risk });
    }
    result
}
