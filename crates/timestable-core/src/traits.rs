//! Core trait definitions for storage and speech backends.
//!
//! These are implemented by the `timestable-storage` and `timestable-speech`
//! crates respectively.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

// ---------------------------------------------------------------------------
// Key-value store trait
// ---------------------------------------------------------------------------

/// Synchronous string key-value storage, the equivalent of browser
/// `localStorage`. One writer per profile; last writer wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Narrator trait
// ---------------------------------------------------------------------------

/// Trait for text-to-speech backends.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Human-readable backend name (e.g. "espeak-ng").
    fn name(&self) -> &str;

    /// Whether this backend can actually produce speech on this machine.
    fn is_supported(&self) -> bool;

    /// Speak an utterance, interrupting anything still being spoken.
    async fn speak(&self, utterance: &Utterance) -> anyhow::Result<()>;

    /// Wait until the current utterance, if any, has been spoken.
    async fn finish(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Something to say, with voice parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text to speak.
    pub text: String,
    /// BCP-47 voice tag (e.g. "zh-CN").
    pub voice: String,
    /// Speaking rate, 1.0 is normal.
    pub rate: f32,
    /// Pitch, 1.0 is normal.
    pub pitch: f32,
    /// Volume in `0.0..=1.0`.
    pub volume: f32,
}

impl Utterance {
    /// Slightly slow and bright, tuned for young learners.
    pub fn new(text: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: voice.into(),
            rate: 0.8,
            pitch: 1.1,
            volume: 0.8,
        }
    }
}
