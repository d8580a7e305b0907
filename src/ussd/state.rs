//! USSD session state and keypad input

use super::menu::StepId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters kept in the input line, emulating a small handset display
pub const INPUT_WINDOW: usize = 8;

/// Keypad keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Star,
    Hash,
    Send,
    Clear,
}

impl Key {
    /// Character appended to the input line, if the key types one
    pub fn typed_char(self) -> Option<char> {
        match self {
            Key::Digit(d) => char::from_digit(u32::from(d), 10),
            Key::Star => Some('*'),
            Key::Hash => Some('#'),
            Key::Send | Key::Clear => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Send => f.write_str("SEND"),
            Key::Clear => f.write_str("CLR"),
            other => match other.typed_char() {
                Some(c) => write!(f, "{c}"),
                None => Ok(()),
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown key: {0}")]
pub struct KeyParseError(pub String);

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SEND" => Ok(Key::Send),
            "CLR" | "CLEAR" => Ok(Key::Clear),
            "*" => Ok(Key::Star),
            "#" => Ok(Key::Hash),
            other => {
                let mut chars = other.chars();
                match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
                    (Some(d), None) => Ok(Key::Digit(u8::try_from(d).unwrap_or_default())),
                    _ => Err(KeyParseError(s.to_string())),
                }
            }
        }
    }
}

/// Current screen plus pending input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UssdState {
    pub step: StepId,
    pub input: String,
}

impl UssdState {
    pub fn new() -> Self {
        Self {
            step: StepId::Welcome,
            input: String::new(),
        }
    }

    /// Append a typed character, keeping only the trailing window
    pub fn with_typed(&self, c: char) -> Self {
        let mut input: Vec<char> = self.input.chars().collect();
        input.push(c);
        let skip = input.len().saturating_sub(INPUT_WINDOW);
        Self {
            step: self.step,
            input: input.into_iter().skip(skip).collect(),
        }
    }

    pub fn cleared(&self) -> Self {
        Self {
            step: self.step,
            input: String::new(),
        }
    }

    pub fn at(step: StepId) -> Self {
        Self {
            step,
            input: String::new(),
        }
    }
}

impl Default for UssdState {
    fn default() -> Self {
        Self::new()
    }
}
