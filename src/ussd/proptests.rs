//! Property-based tests for the USSD state machine

use super::effect::Effect;
use super::menu::StepId;
use super::state::{Key, UssdState, INPUT_WINDOW};
use super::transition::transition;
use proptest::prelude::*;

fn arb_step() -> impl Strategy<Value = StepId> {
    prop_oneof![
        Just(StepId::Welcome),
        Just(StepId::Main),
        Just(StepId::Sympt),
        Just(StepId::Sev),
        Just(StepId::Mental),
        Just(StepId::CritEnd),
        Just(StepId::Routine),
        Just(StepId::MentalEnd),
    ]
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        6 => (0u8..10).prop_map(Key::Digit),
        1 => Just(Key::Star),
        1 => Just(Key::Hash),
        2 => Just(Key::Send),
        1 => Just(Key::Clear),
    ]
}

proptest! {
    #[test]
    fn input_never_exceeds_window(keys in proptest::collection::vec(arb_key(), 0..40)) {
        let mut state = UssdState::new();
        for key in keys {
            state = transition(&state, key).new_state;
            prop_assert!(state.input.chars().count() <= INPUT_WINDOW);
        }
    }

    #[test]
    fn main_rejects_out_of_range(choice in 5u8..=255) {
        let state = UssdState { step: StepId::Main, input: choice.to_string() };
        let result = transition(&state, Key::Send);
        prop_assert_eq!(result.new_state, UssdState::at(StepId::Main));
        prop_assert_eq!(result.effects, vec![Effect::invalid_option()]);
    }

    #[test]
    fn main_option_one_always_reaches_symptoms(prefix in "0{0,7}") {
        let state = UssdState { step: StepId::Main, input: format!("{prefix}1") };
        prop_assert_eq!(transition(&state, Key::Send).new_state.step, StepId::Sympt);
    }

    #[test]
    fn escalation_only_on_entering_critical_end(step in arb_step(), key in arb_key()) {
        let state = UssdState::at(step).with_typed('1');
        let result = transition(&state, key);
        let escalated = result.effects.contains(&Effect::Escalate);
        prop_assert_eq!(escalated, result.new_state.step == StepId::CritEnd && step != StepId::CritEnd);
    }

    #[test]
    fn typing_never_changes_screen(step in arb_step(), digit in 0u8..10) {
        let result = transition(&UssdState::at(step), Key::Digit(digit));
        prop_assert_eq!(result.new_state.step, step);
        prop_assert!(result.effects.is_empty());
    }
}
