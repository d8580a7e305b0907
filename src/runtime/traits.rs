//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the store and the voice session with mock
//! implementations.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Persistence
// ============================================================================

/// The six independent blobs that make up a store snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Patients,
    Alerts,
    Calls,
    Dispatches,
    Metrics,
    Outbreaks,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Patients,
        StoreKey::Alerts,
        StoreKey::Calls,
        StoreKey::Dispatches,
        StoreKey::Metrics,
        StoreKey::Outbreaks,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StoreKey::Patients => "koni_patients",
            StoreKey::Alerts => "koni_alerts",
            StoreKey::Calls => "koni_calls",
            StoreKey::Dispatches => "koni_dispatches",
            StoreKey::Metrics => "koni_metrics",
            StoreKey::Outbreaks => "koni_outbreaks",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Persistence backend error: {0}")]
    Backend(String),
    #[error("Failed to encode {key}: {source}")]
    Encode {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value blob store the Event Store reads at startup and writes after
/// every mutation
pub trait Persistence: Send + Sync {
    fn load(&self, key: StoreKey) -> Result<Option<String>, PersistError>;

    fn save(&self, key: StoreKey, blob: &str) -> Result<(), PersistError>;

    /// Write a whole snapshot. Backends with transactions apply it atomically;
    /// the default writes blob by blob and stops at the first failure.
    fn save_all(&self, blobs: &[(StoreKey, String)]) -> Result<(), PersistError> {
        blobs.iter().try_for_each(|(key, blob)| self.save(*key, blob))
    }

    /// Drop every stored blob
    fn clear(&self) -> Result<(), PersistError>;
}

// ============================================================================
// Speech capabilities
// ============================================================================

/// Why a listen attempt produced no usable text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenFailure {
    NoSupport,
    Error,
    End,
    Timeout,
}

impl ListenFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            ListenFailure::NoSupport => "nosupport",
            ListenFailure::Error => "error",
            ListenFailure::End => "end",
            ListenFailure::Timeout => "timeout",
        }
    }
}

/// Outcome of one speech-input attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    Heard(String),
    Failed(ListenFailure),
}

impl ListenOutcome {
    /// Recognized text, if any was produced
    pub fn text(&self) -> Option<&str> {
        match self {
            ListenOutcome::Heard(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Speech output (text-to-speech), fire-and-forget
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str, language: &str);
}

/// Speech input (speech-to-text)
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Listen for a single utterance.
    ///
    /// Implementations should stop recognizing once `cancel` fires. The caller
    /// also enforces `timeout` on its own.
    async fn listen(
        &self,
        language: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> ListenOutcome;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: Persistence + ?Sized> Persistence for Arc<T> {
    fn load(&self, key: StoreKey) -> Result<Option<String>, PersistError> {
        (**self).load(key)
    }

    fn save(&self, key: StoreKey, blob: &str) -> Result<(), PersistError> {
        (**self).save(key, blob)
    }

    fn save_all(&self, blobs: &[(StoreKey, String)]) -> Result<(), PersistError> {
        (**self).save_all(blobs)
    }

    fn clear(&self) -> Result<(), PersistError> {
        (**self).clear()
    }
}

impl<T: SpeechOutput + ?Sized> SpeechOutput for Arc<T> {
    fn speak(&self, text: &str, language: &str) {
        (**self).speak(text, language);
    }
}

#[async_trait]
impl<T: SpeechInput + ?Sized> SpeechInput for Arc<T> {
    async fn listen(
        &self,
        language: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> ListenOutcome {
        (**self).listen(language, timeout, cancel).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::db::Database;

impl Persistence for Database {
    fn load(&self, key: StoreKey) -> Result<Option<String>, PersistError> {
        self.get_blob(key.as_str())
            .map_err(|e| PersistError::Backend(e.to_string()))
    }

    fn save(&self, key: StoreKey, blob: &str) -> Result<(), PersistError> {
        self.put_blob(key.as_str(), blob)
            .map_err(|e| PersistError::Backend(e.to_string()))
    }

    fn save_all(&self, blobs: &[(StoreKey, String)]) -> Result<(), PersistError> {
        let rows: Vec<(&str, &str)> = blobs
            .iter()
            .map(|(key, blob)| (key.as_str(), blob.as_str()))
            .collect();
        self.put_blobs(&rows)
            .map_err(|e| PersistError::Backend(e.to_string()))
    }

    fn clear(&self) -> Result<(), PersistError> {
        self.clear_blobs()
            .map_err(|e| PersistError::Backend(e.to_string()))
    }
}

/// Speech output for terminals: prints the prompt instead of voicing it
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSpeech;

impl SpeechOutput for ConsoleSpeech {
    fn speak(&self, text: &str, language: &str) {
        tracing::debug!(language, "Speaking prompt");
        println!("KONI> {text}");
    }
}

/// Speech input for hosts without a recognizer
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSpeechInput;

#[async_trait]
impl SpeechInput for NoSpeechInput {
    async fn listen(
        &self,
        _language: &str,
        _timeout: Duration,
        _cancel: CancellationToken,
    ) -> ListenOutcome {
        ListenOutcome::Failed(ListenFailure::NoSupport)
    }
}
