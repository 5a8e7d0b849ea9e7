//! Recording narrator for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use timestable_core::traits::{Narrator, Utterance};

/// A narrator that records utterances instead of speaking them.
pub struct RecordingNarrator {
    supported: bool,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Everything spoken, oldest first.
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingNarrator {
    pub fn new() -> Self {
        Self {
            supported: true,
            call_count: AtomicU32::new(0),
            spoken: Mutex::new(Vec::new()),
        }
    }

    /// A narrator that reports itself as unavailable.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new()
        }
    }

    /// Get the number of calls made to this narrator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_utterance(&self) -> Option<Utterance> {
        self.spoken.lock().unwrap().last().cloned()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.text.clone())
            .collect()
    }
}

impl Default for RecordingNarrator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Narrator for RecordingNarrator {
    fn name(&self) -> &str {
        "recording"
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn speak(&self, utterance: &Utterance) -> anyhow::Result<()> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.spoken.lock().unwrap().push(utterance.clone());
        Ok(())
    }
}
