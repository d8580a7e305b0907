//! Menu content and branch selection

use serde::{Deserialize, Serialize};

/// Named menu screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepId {
    Welcome,
    Main,
    Sympt,
    Sev,
    Mental,
    CritEnd,
    Routine,
    MentalEnd,
}

/// Risk attached to a terminal screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    Low,
    Medium,
    Critical,
}

/// How the next screen is chosen after a valid selection
#[derive(Clone, Copy)]
pub enum Next {
    Fixed(StepId),
    Select(fn(u8) -> StepId),
}

pub struct Step {
    /// Screen text; `{caller}` is replaced with the caller's name
    pub text: &'static str,
    /// Valid selections; empty for terminal screens
    pub options: &'static [u8],
    pub next: Option<Next>,
    pub end_risk: Option<Risk>,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        self.options.is_empty()
    }

    pub fn next_for(&self, choice: u8) -> Option<StepId> {
        match self.next? {
            Next::Fixed(id) => Some(id),
            Next::Select(select) => Some(select(choice)),
        }
    }
}

fn main_next(choice: u8) -> StepId {
    if choice == 1 {
        StepId::Sympt
    } else {
        StepId::Mental
    }
}

fn symptom_next(choice: u8) -> StepId {
    if choice <= 2 {
        StepId::Sev
    } else {
        StepId::Routine
    }
}

fn severity_next(choice: u8) -> StepId {
    if choice == 1 {
        StepId::CritEnd
    } else {
        StepId::Routine
    }
}

const WELCOME: Step = Step {
    text: "Koni Health v2.0\n1. English\n2. Kasem\n3. Nankam",
    options: &[1, 2, 3],
    next: Some(Next::Fixed(StepId::Main)),
    end_risk: None,
};

const MAIN: Step = Step {
    text: "Welcome, {caller}.\n1. Report Symptom\n2. Mental Check-in\n3. Med Refill\n4. Pregnancy Check",
    options: &[1, 2, 3, 4],
    next: Some(Next::Select(main_next)),
    end_risk: None,
};

const SYMPT: Step = Step {
    text: "Select Symptom:\n1. Chest Pain\n2. Blurry Vision/Headache\n3. Swollen Feet\n4. Foot Wound + Smell\n5. Watery Diarrhea\n6. Just Tired",
    options: &[1, 2, 3, 4, 5, 6],
    next: Some(Next::Select(symptom_next)),
    end_risk: None,
};

const SEV: Step = Step {
    text: "WARNING: Is this sudden or severe?\n1. Yes, severe\n2. Mild/Chronic",
    options: &[1, 2],
    next: Some(Next::Select(severity_next)),
    end_risk: None,
};

const MENTAL: Step = Step {
    text: "Past 2 weeks: little interest/pleasure?\n1. Yes\n2. No",
    options: &[1, 2],
    next: Some(Next::Fixed(StepId::MentalEnd)),
    end_risk: None,
};

const CRIT_END: Step = Step {
    text: "!!! ALERT !!!\nDanger sign detected.\nStay calm.\nA nurse is being alerted now.\nDo not hang up.",
    options: &[],
    next: None,
    end_risk: Some(Risk::Critical),
};

const ROUTINE: Step = Step {
    text: "Logged. Please rest and drink water.\nNurse notified for routine review.",
    options: &[],
    next: None,
    end_risk: Some(Risk::Low),
};

const MENTAL_END: Step = Step {
    text: "Thank you.\nA counselor will check in this week.",
    options: &[],
    next: None,
    end_risk: Some(Risk::Medium),
};

impl StepId {
    pub fn step(self) -> &'static Step {
        match self {
            StepId::Welcome => &WELCOME,
            StepId::Main => &MAIN,
            StepId::Sympt => &SYMPT,
            StepId::Sev => &SEV,
            StepId::Mental => &MENTAL,
            StepId::CritEnd => &CRIT_END,
            StepId::Routine => &ROUTINE,
            StepId::MentalEnd => &MENTAL_END,
        }
    }

    pub fn screen_text(self, caller: &str) -> String {
        self.step().text.replace("{caller}", caller)
    }
}
