//! Voice (IVR) call sessions
//!
//! Sequences spoken prompts, waits on the speech-input capability with a
//! timeout, triages each reply, and escalates when the call closes.

mod prompts;
mod session;

pub use prompts::{Language, LanguageParseError, PromptId, PromptParseError};
pub use session::{CallPhase, ReplySource, VoiceSession};
