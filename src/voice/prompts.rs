//! Prompt script and fallback replies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptId {
    Greet,
    /// Medication adherence probe
    MedsProbe,
    /// Danger-sign probe; always closes the call
    DangerProbe,
    Close,
}

impl PromptId {
    pub fn text(self) -> &'static str {
        match self {
            PromptId::Greet => "Hello. This is Koni Health. How are you feeling today?",
            PromptId::MedsProbe => "Thank you. Did you take your medicine today?",
            PromptId::DangerProbe => {
                "Are you feeling any chest pain, severe headache, or new swelling of the feet?"
            }
            PromptId::Close => "Okay. Please stay calm. We are notifying your community nurse now.",
        }
    }

    /// Reply used when neither the recognizer nor the operator supplied one
    pub fn canned_reply(self) -> &'static str {
        match self {
            PromptId::Greet => "I feel dizzy and my vision is blurry.",
            PromptId::MedsProbe => "I missed my pills today and yesterday. No money.",
            PromptId::DangerProbe => "Yes, I have chest pain and swollen feet.",
            PromptId::Close => "Okay",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PromptId::Greet => "greet",
            PromptId::MedsProbe => "probe1",
            PromptId::DangerProbe => "probe2",
            PromptId::Close => "close",
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown prompt: {0}")]
pub struct PromptParseError(pub String);

impl FromStr for PromptId {
    type Err = PromptParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greet" | "start" => Ok(PromptId::Greet),
            "meds" | "probe1" => Ok(PromptId::MedsProbe),
            "danger" | "probe2" => Ok(PromptId::DangerProbe),
            "close" => Ok(PromptId::Close),
            _ => Err(PromptParseError(s.to_string())),
        }
    }
}

/// Caller's selected language.
///
/// Only English voices exist, so every language speaks and listens in `en-US`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Kasem,
    Nankam,
}

impl Language {
    #[allow(clippy::unused_self)]
    pub fn speech_tag(self) -> &'static str {
        "en-US"
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "en-US",
            Language::Kasem => "kasem",
            Language::Nankam => "nankam",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown language: {0}")]
pub struct LanguageParseError(pub String);

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Language::English),
            "kasem" => Ok(Language::Kasem),
            "nankam" => Ok(Language::Nankam),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::{classify, Severity};

    #[test]
    fn parses_prompt_aliases() {
        assert_eq!("danger".parse(), Ok(PromptId::DangerProbe));
        assert_eq!("probe1".parse(), Ok(PromptId::MedsProbe));
        assert!("hello".parse::<PromptId>().is_err());
    }

    #[test]
    fn every_language_speaks_english() {
        for lang in [Language::English, Language::Kasem, Language::Nankam] {
            assert_eq!(lang.speech_tag(), "en-US");
        }
        assert_eq!("Kasem".parse(), Ok(Language::Kasem));
    }

    #[test]
    fn canned_replies_triage_as_scripted() {
        assert_eq!(classify(Some(PromptId::Greet.canned_reply())).severity, Severity::Critical);
        assert_eq!(classify(Some(PromptId::MedsProbe.canned_reply())).severity, Severity::Warning);
        assert_eq!(classify(Some(PromptId::DangerProbe.canned_reply())).severity, Severity::Critical);
        assert_eq!(classify(Some(PromptId::Close.canned_reply())).severity, Severity::Low);
    }
}
