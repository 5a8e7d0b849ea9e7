//! A narrator that never speaks.

use async_trait::async_trait;

use timestable_core::traits::{Narrator, Utterance};

/// Used when speech is disabled or no backend is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNarrator;

#[async_trait]
impl Narrator for SilentNarrator {
    fn name(&self) -> &str {
        "silent"
    }

    fn is_supported(&self) -> bool {
        false
    }

    async fn speak(&self, _utterance: &Utterance) -> anyhow::Result<()> {
        Ok(())
    }
}
