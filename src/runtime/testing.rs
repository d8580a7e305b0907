//! Mock implementations for testing
//!
//! These mocks enable store and voice-session tests without real I/O.

use super::traits::*;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Persistence
// ============================================================================

/// In-memory persistence with a record of every write
#[derive(Default)]
pub struct MemoryPersistence {
    blobs: Mutex<HashMap<StoreKey, String>>,
    /// Number of `save` calls observed
    pub saves: Mutex<usize>,
    /// Number of `clear` calls observed
    pub clears: Mutex<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob as if written by an earlier run
    pub fn with_blob(self, key: StoreKey, blob: impl Into<String>) -> Self {
        self.blobs.lock().unwrap().insert(key, blob.into());
        self
    }

    pub fn blob(&self, key: StoreKey) -> Option<String> {
        self.blobs.lock().unwrap().get(&key).cloned()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, key: StoreKey) -> Result<Option<String>, PersistError> {
        Ok(self.blob(key))
    }

    fn save(&self, key: StoreKey, blob: &str) -> Result<(), PersistError> {
        *self.saves.lock().unwrap() += 1;
        self.blobs.lock().unwrap().insert(key, blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), PersistError> {
        *self.clears.lock().unwrap() += 1;
        self.blobs.lock().unwrap().clear();
        Ok(())
    }
}

/// Persistence whose writes always fail
#[derive(Default)]
pub struct FailingPersistence;

impl Persistence for FailingPersistence {
    fn load(&self, _key: StoreKey) -> Result<Option<String>, PersistError> {
        Err(PersistError::Backend("disk unavailable".into()))
    }

    fn save(&self, _key: StoreKey, _blob: &str) -> Result<(), PersistError> {
        Err(PersistError::Backend("disk full".into()))
    }

    fn clear(&self) -> Result<(), PersistError> {
        Err(PersistError::Backend("disk full".into()))
    }
}

// ============================================================================
// Speech
// ============================================================================

/// Speech output that records what was spoken
#[derive(Default)]
pub struct RecordingSpeech {
    pub spoken: Mutex<Vec<(String, String)>>,
}

impl RecordingSpeech {
    pub fn texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn languages(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|(_, lang)| lang.clone())
            .collect()
    }
}

impl SpeechOutput for RecordingSpeech {
    fn speak(&self, text: &str, language: &str) {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), language.to_string()));
    }
}

/// Scripted reply for one listen call
#[derive(Debug, Clone)]
pub enum Scripted {
    Outcome(ListenOutcome),
    /// Never resolve until cancelled
    Hang,
}

/// Speech input that replays queued outcomes
#[derive(Default)]
pub struct ScriptedSpeechInput {
    script: Mutex<VecDeque<Scripted>>,
    /// Timeouts passed to `listen`
    pub timeouts: Mutex<Vec<Duration>>,
}

impl ScriptedSpeechInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heard(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Outcome(ListenOutcome::Heard(text.into())))
    }

    pub fn failed(self, reason: ListenFailure) -> Self {
        self.push(Scripted::Outcome(ListenOutcome::Failed(reason)))
    }

    pub fn hang(self) -> Self {
        self.push(Scripted::Hang)
    }

    fn push(self, item: Scripted) -> Self {
        self.script.lock().unwrap().push_back(item);
        self
    }

    pub fn recorded_timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechInput for ScriptedSpeechInput {
    async fn listen(
        &self,
        _language: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> ListenOutcome {
        self.timeouts.lock().unwrap().push(timeout);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Outcome(outcome)) => outcome,
            Some(Scripted::Hang) => {
                cancel.cancelled().await;
                ListenOutcome::Failed(ListenFailure::End)
            }
            None => ListenOutcome::Failed(ListenFailure::NoSupport),
        }
    }
}
