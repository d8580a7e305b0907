//! Effects produced by USSD transitions

use super::menu::Risk;
use std::time::Duration;

/// How long a validation notice stays on screen
pub const NOTICE_TTL: Duration = Duration::from_secs(1);

/// Effects to be executed after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a transient notice over the screen
    Notice { text: &'static str, ttl: Duration },

    /// Raise a critical alert for this caller
    Escalate,

    /// The session reached a terminal screen
    SessionClosed { risk: Risk },
}

impl Effect {
    pub fn invalid_option() -> Self {
        Effect::Notice {
            text: "Invalid option",
            ttl: NOTICE_TTL,
        }
    }
}
