//! Narrator construction from configuration.

use std::sync::Arc;

use timestable_core::config::{SpeechBackend, SpeechConfig};
use timestable_core::traits::Narrator;

use crate::command::CommandNarrator;
use crate::error::SpeechError;
use crate::silent::SilentNarrator;

/// Create a narrator from its configuration.
///
/// Disabled speech yields a [`SilentNarrator`]. A command backend whose
/// program is missing is still returned; it reports itself unsupported.
pub fn create_narrator(config: &SpeechConfig) -> Result<Arc<dyn Narrator>, SpeechError> {
    if !config.enabled {
        return Ok(Arc::new(SilentNarrator));
    }
    match config.backend {
        SpeechBackend::Silent => Ok(Arc::new(SilentNarrator)),
        SpeechBackend::Command => {
            if config.program.trim().is_empty() {
                return Err(SpeechError::InvalidConfig(
                    "speech.program must not be empty".into(),
                ));
            }
            let narrator = CommandNarrator::new(config.program.clone(), config.args.clone());
            if !narrator.is_supported() {
                tracing::warn!(program = %config.program, "speech program not found, speech disabled");
            }
            Ok(Arc::new(narrator))
        }
    }
}
