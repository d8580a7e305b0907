//! Utterance triage
//!
//! Maps noisy free-text replies onto a symptom tag set and a severity verdict.

mod classifier;

#[cfg(test)]
mod proptests;

pub use classifier::{classify, Triage};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symptom tags produced by the classifier
///
/// Declaration order is the keyword-group evaluation order, so a `BTreeSet<Tag>`
/// iterates in the same order the notes were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    ChestPain,
    Neuro,
    Dizziness,
    Edema,
    Fever,
    Diarrhea,
    Dyspnea,
    Pregnancy,
    NonAdherence,
    FootWound,
}

impl Tag {
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::ChestPain => "chest_pain",
            Tag::Neuro => "neuro",
            Tag::Dizziness => "dizziness",
            Tag::Edema => "edema",
            Tag::Fever => "fever",
            Tag::Diarrhea => "diarrhea",
            Tag::Dyspnea => "dyspnea",
            Tag::Pregnancy => "pregnancy",
            Tag::NonAdherence => "non_adherence",
            Tag::FootWound => "foot_wound",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    pub fn is_critical(self) -> bool {
        self == Severity::Critical
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
