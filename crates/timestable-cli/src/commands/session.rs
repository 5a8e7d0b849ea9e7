//! Shared plumbing for the timed commands (`quiz`, `review`, `resume`).

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use timestable_core::driver::{DriverConfig, SessionDriver, SessionStart, SessionSummary, UserInput};
use timestable_core::locale::Locale;
use timestable_core::traits::KeyValueStore;
use timestable_speech::create_narrator;

use crate::context::AppContext;
use crate::i18n::Messages;
use crate::input::parse_answer;
use crate::reporter::TerminalReporter;

/// Read answers from stdin on a dedicated thread.
///
/// A blocking read never holds up the runtime; the thread exits at EOF or once
/// the session stops listening.
fn spawn_stdin_reader(locale: Locale) -> mpsc::Receiver<UserInput> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let messages = Messages::load(locale);
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_answer(&line) {
                Some(input) => {
                    if tx.blocking_send(input).is_err() {
                        break;
                    }
                }
                None => println!(
                    "{}",
                    messages.t("quiz.invalidInput", &[("input", &line.trim())])
                ),
            }
        }
    });
    rx
}

/// Run one session against the terminal.
pub async fn run(ctx: &AppContext, start: SessionStart) -> Result<SessionSummary> {
    let narrator = create_narrator(&ctx.config.speech).context("failed to set up speech")?;
    let store: Arc<dyn KeyValueStore> = ctx.store.clone();
    let driver = SessionDriver::new(
        store,
        narrator.clone(),
        ctx.clock.clone(),
        DriverConfig::from_config(&ctx.config, ctx.locale),
    );

    let reporter = TerminalReporter::new(&ctx.messages, ctx.config.daily_target);
    match &start {
        SessionStart::New { mode, difficulty } => reporter.announce(*mode, *difficulty),
        SessionStart::Resume(snapshot) => {
            if let Some(mode) = snapshot.mode {
                reporter.announce(mode, snapshot.difficulty);
            }
        }
    }

    let inputs = spawn_stdin_reader(ctx.locale);
    let summary = driver.run(start, inputs, &reporter).await?;

    if let Err(e) = narrator.finish().await {
        tracing::warn!("speech failed: {e:#}");
    }
    Ok(summary)
}
