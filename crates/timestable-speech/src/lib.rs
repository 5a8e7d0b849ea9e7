//! timestable-speech: text-to-speech backends.
//!
//! Implements the `Narrator` trait by running an external speech program
//! (espeak-ng by default), plus silent and recording narrators.

pub mod command;
pub mod error;
pub mod factory;
pub mod mock;
pub mod silent;

pub use command::CommandNarrator;
pub use error::SpeechError;
pub use factory::create_narrator;
pub use mock::RecordingNarrator;
pub use silent::SilentNarrator;
