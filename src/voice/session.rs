//! Voice session controller

use super::prompts::{Language, PromptId};
use crate::escalation;
use crate::runtime::{ListenFailure, ListenOutcome, Persistence, SpeechInput, SpeechOutput};
use crate::store::{new_id, EventStore, TranscriptLine};
use crate::triage::{classify, Triage};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Observable call phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Ready,
    Listening(PromptId),
    Ended,
    Abandoned,
}

/// Where the patient's reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Heard,
    /// Operator-typed stand-in reply
    Simulated,
    /// Fixed reply for the prompt
    Canned,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Call has ended; start a new call")]
    Ended,
    #[error("Call was hung up")]
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOutcome {
    pub prompt: PromptId,
    pub reply: String,
    pub source: ReplySource,
    pub triage: Triage,
    /// The call closed after this reply and was escalated
    pub closed: bool,
}

/// One IVR call. Ending is terminal; a new call needs a new session.
pub struct VoiceSession<I, O, P>
where
    I: SpeechInput,
    O: SpeechOutput,
    P: Persistence,
{
    store: Arc<EventStore<P>>,
    input: I,
    output: O,
    language: Language,
    listen_timeout: Duration,
    simulated_reply: Option<String>,
    transcript: Vec<TranscriptLine>,
    phase_tx: watch::Sender<CallPhase>,
    hangup: CancellationToken,
}

impl<I, O, P> VoiceSession<I, O, P>
where
    I: SpeechInput,
    O: SpeechOutput,
    P: Persistence,
{
    pub fn new(store: Arc<EventStore<P>>, input: I, output: O, listen_timeout: Duration) -> Self {
        let (phase_tx, _) = watch::channel(CallPhase::Ready);
        Self {
            store,
            input,
            output,
            language: Language::default(),
            listen_timeout,
            simulated_reply: None,
            transcript: Vec::new(),
            phase_tx,
            hangup: CancellationToken::new(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Reply to use when speech input yields nothing. Empty text clears it.
    pub fn set_simulated_reply(&mut self, reply: impl Into<String>) {
        let reply = reply.into();
        self.simulated_reply = (!reply.trim().is_empty()).then_some(reply);
    }

    pub fn phase(&self) -> CallPhase {
        let phase = *self.phase_tx.borrow();
        if self.hangup.is_cancelled() && phase != CallPhase::Ended {
            CallPhase::Abandoned
        } else {
            phase
        }
    }

    pub fn watch_phase(&self) -> watch::Receiver<CallPhase> {
        self.phase_tx.subscribe()
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    /// Token that hangs up the call, aborting any pending listen
    pub fn hangup_handle(&self) -> CancellationToken {
        self.hangup.clone()
    }

    /// Speak a prompt, wait for the reply, and triage it.
    ///
    /// Closes and escalates the call when the reply is critical or the prompt
    /// is the danger probe.
    pub async fn ask(&mut self, prompt: PromptId) -> Result<AskOutcome, SessionError> {
        self.ensure_open()?;

        self.say(prompt.text());
        self.set_phase(CallPhase::Listening(prompt));
        let Some(outcome) = self.listen().await else {
            self.set_phase(CallPhase::Abandoned);
            tracing::info!(prompt = %prompt, "Call hung up while listening");
            return Err(SessionError::Abandoned);
        };
        self.set_phase(CallPhase::Ready);

        let (reply, source) = self.choose_reply(prompt, &outcome);
        self.transcript.push(TranscriptLine::patient(reply.clone()));
        let triage = classify(Some(&reply));
        tracing::debug!(prompt = %prompt, severity = %triage.severity, source = ?source, "Triaged reply");

        let closed = triage.severity.is_critical() || prompt == PromptId::DangerProbe;
        if closed {
            self.close(&triage);
        }

        Ok(AskOutcome {
            prompt,
            reply,
            source,
            triage,
            closed,
        })
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.hangup.is_cancelled() {
            self.set_phase(CallPhase::Abandoned);
            return Err(SessionError::Abandoned);
        }
        if *self.phase_tx.borrow() == CallPhase::Ended {
            return Err(SessionError::Ended);
        }
        Ok(())
    }

    fn say(&mut self, text: &str) {
        self.output.speak(text, self.language.speech_tag());
        self.transcript.push(TranscriptLine::system(text));
    }

    /// `None` when the call was hung up mid-listen
    async fn listen(&self) -> Option<ListenOutcome> {
        let token = self.hangup.child_token();
        let listen = self.input.listen(
            self.language.speech_tag(),
            self.listen_timeout,
            token.clone(),
        );
        let outcome = tokio::select! {
            biased;
            () = self.hangup.cancelled() => None,
            result = tokio::time::timeout(self.listen_timeout, listen) => {
                Some(result.unwrap_or(ListenOutcome::Failed(ListenFailure::Timeout)))
            }
        };
        token.cancel();
        outcome
    }

    fn choose_reply(&self, prompt: PromptId, outcome: &ListenOutcome) -> (String, ReplySource) {
        if let Some(text) = outcome.text() {
            return (text.to_string(), ReplySource::Heard);
        }
        if let ListenOutcome::Failed(reason) = outcome {
            tracing::warn!(prompt = %prompt, reason = reason.as_str(), "Speech input unavailable, using fallback reply");
        }
        match &self.simulated_reply {
            Some(reply) => (reply.clone(), ReplySource::Simulated),
            None => (prompt.canned_reply().to_string(), ReplySource::Canned),
        }
    }

    fn close(&mut self, triage: &Triage) {
        self.say(PromptId::Close.text());
        self.set_phase(CallPhase::Ended);

        let actions = escalation::voice_call_actions(
            &new_id(),
            Utc::now(),
            self.transcript.clone(),
            triage,
        );
        tracing::info!(
            severity = %triage.severity,
            tags = ?triage.tags,
            actions = actions.len(),
            "Voice call closed, escalating"
        );
        for action in actions {
            self.store.dispatch(action);
        }
    }

    fn set_phase(&self, phase: CallPhase) {
        self.phase_tx.send_replace(phase);
    }
}

impl<I, O, P> Drop for VoiceSession<I, O, P>
where
    I: SpeechInput,
    O: SpeechOutput,
    P: Persistence,
{
    fn drop(&mut self) {
        // Abandoning the call releases any listener still holding the token
        self.hangup.cancel();
    }
}
