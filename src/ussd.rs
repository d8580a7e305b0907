//! USSD dialog state machine
//!
//! A fixed menu graph driven by keypresses. Transitions are pure; the phone
//! driver executes the effects they produce.

mod effect;
mod menu;
mod phone;
pub mod state;
mod transition;

#[cfg(test)]
mod proptests;

#[cfg(test)]
pub use menu::StepId;
pub use phone::{Screen, UssdPhone};
pub use state::Key;
