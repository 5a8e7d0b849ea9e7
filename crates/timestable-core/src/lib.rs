//! timestable-core: Quiz engine, progress tracking, and achievements.
//!
//! This crate defines the data model, the question and distractor generators,
//! the progress reducer, and the session state machine that the rest of
//! timestable builds on.

pub mod achievements;
pub mod clock;
pub mod config;
pub mod distractors;
pub mod driver;
pub mod error;
pub mod generator;
pub mod learn;
pub mod locale;
pub mod model;
pub mod progress;
pub mod session;
pub mod statistics;
pub mod storage;
pub mod traits;
