//! Async session driver.
//!
//! Runs one [`QuizSession`] against live input: the countdown and the deferred
//! advance are spawned tokio tasks that post generation-tagged events back to
//! the driver loop, and are aborted whenever the turn they belong to ends.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::achievements::AchievementId;
use crate::clock::Clock;
use crate::config::TutorConfig;
use crate::learn::formula_text;
use crate::locale::Locale;
use crate::model::{Difficulty, QuizMode, UserProgress};
use crate::session::{
    AdvanceOutcome, AnswerOutcome, CompletionKind, QuizSession, QuizSnapshot, StartOutcome,
    TickOutcome, Turn,
};
use crate::storage;
use crate::traits::{KeyValueStore, Narrator, Utterance};

/// Configuration for the session driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Countdown step.
    pub tick: Duration,
    /// Delay between an answer and the next question.
    pub advance_delay: Duration,
    pub countdown_secs: u32,
    pub daily_target: u32,
    pub speech_enabled: bool,
    pub locale: Locale,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            advance_delay: Duration::from_millis(3000),
            countdown_secs: crate::session::DEFAULT_COUNTDOWN_SECS,
            daily_target: crate::model::DEFAULT_DAILY_TARGET,
            speech_enabled: true,
            locale: Locale::default(),
            seed: None,
        }
    }
}

impl DriverConfig {
    pub fn from_config(config: &TutorConfig, locale: Locale) -> Self {
        Self {
            advance_delay: Duration::from_millis(config.advance_delay_ms),
            countdown_secs: config.countdown_secs,
            daily_target: config.daily_target,
            speech_enabled: config.speech.enabled,
            locale,
            ..Self::default()
        }
    }
}

/// Input from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    /// Submit a value.
    Answer(u32),
    /// Submit the option at this index.
    Choose(usize),
    Pause,
    Resume,
    Stop,
}

/// How to begin a run.
#[derive(Debug, Clone)]
pub enum SessionStart {
    New {
        mode: QuizMode,
        difficulty: Difficulty,
    },
    Resume(QuizSnapshot),
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Completed(CompletionKind),
    NothingToReview,
    DailyTargetMet,
    NothingToResume,
    /// The player quit.
    Stopped,
    /// Input closed mid-turn; the turn was saved for `resume`.
    Interrupted,
}

/// Result of a driver run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub mode: QuizMode,
    pub difficulty: Difficulty,
    pub questions_answered: u32,
    pub score: u32,
    pub end: EndReason,
}

impl SessionSummary {
    fn of(session: &QuizSession, end: EndReason) -> Self {
        Self {
            session_id: session.id(),
            mode: session.mode(),
            difficulty: session.difficulty(),
            questions_answered: session.questions_answered(),
            score: session.score(),
            end,
        }
    }
}

/// Session event sink, e.g. the terminal UI.
pub trait SessionReporter: Send + Sync {
    fn on_question(&self, session: &QuizSession, turn: &Turn);
    fn on_tick(&self, time_left: u32);
    fn on_answer(&self, outcome: &AnswerOutcome, progress: &UserProgress);
    fn on_achievements(&self, unlocked: &BTreeSet<AchievementId>);
    fn on_paused(&self);
    fn on_resumed(&self, turn: &Turn);
    fn on_complete(&self, summary: &SessionSummary);
}

/// No-op session reporter.
pub struct NoopReporter;

impl SessionReporter for NoopReporter {
    fn on_question(&self, _: &QuizSession, _: &Turn) {}
    fn on_tick(&self, _: u32) {}
    fn on_answer(&self, _: &AnswerOutcome, _: &UserProgress) {}
    fn on_achievements(&self, _: &BTreeSet<AchievementId>) {}
    fn on_paused(&self) {}
    fn on_resumed(&self, _: &Turn) {}
    fn on_complete(&self, _: &SessionSummary) {}
}

#[derive(Debug, Clone, Copy)]
enum TimerEvent {
    Tick(u64),
    Advance(u64),
}

/// Handles of the running timer tasks. Dropping aborts them.
#[derive(Default)]
struct Timers {
    countdown: Option<JoinHandle<()>>,
    advance: Option<JoinHandle<()>>,
}

impl Timers {
    fn start_countdown(&mut self, generation: u64, period: Duration, tx: &mpsc::UnboundedSender<TimerEvent>) {
        self.cancel();
        let tx = tx.clone();
        self.countdown = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(TimerEvent::Tick(generation)).is_err() {
                    break;
                }
            }
        }));
    }

    fn schedule_advance(&mut self, generation: u64, delay: Duration, tx: &mpsc::UnboundedSender<TimerEvent>) {
        self.cancel();
        let tx = tx.clone();
        self.advance = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(TimerEvent::Advance(generation));
        }));
    }

    fn cancel(&mut self) {
        for handle in [self.countdown.take(), self.advance.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drives quiz and review sessions.
pub struct SessionDriver {
    store: Arc<dyn KeyValueStore>,
    narrator: Arc<dyn Narrator>,
    clock: Arc<dyn Clock>,
    config: DriverConfig,
}

impl SessionDriver {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        narrator: Arc<dyn Narrator>,
        clock: Arc<dyn Clock>,
        config: DriverConfig,
    ) -> Self {
        Self {
            store,
            narrator,
            clock,
            config,
        }
    }

    /// Run a session until it completes, is stopped, or input closes.
    pub async fn run(
        &self,
        start: SessionStart,
        mut inputs: mpsc::Receiver<UserInput>,
        reporter: &dyn SessionReporter,
    ) -> Result<SessionSummary> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut progress = storage::load_progress(self.store.as_ref(), self.clock.today());
        progress.set_daily_target(self.config.daily_target);

        let (session, first_turn) = match start {
            SessionStart::New { mode, difficulty } => {
                let mut session =
                    QuizSession::new(mode, difficulty).with_countdown(self.config.countdown_secs);
                match session.start(&progress, self.clock.as_ref(), &mut rng) {
                    StartOutcome::Started(turn) => (session, turn),
                    StartOutcome::NothingToReview => {
                        return self.finish(&session, EndReason::NothingToReview, reporter);
                    }
                    StartOutcome::DailyTargetMet => {
                        return self.finish(&session, EndReason::DailyTargetMet, reporter);
                    }
                }
            }
            SessionStart::Resume(snapshot) => {
                let restored = QuizSession::restore(&snapshot, self.config.countdown_secs)
                    .and_then(|session| {
                        let turn = session.current_turn().cloned()?;
                        Some((session, turn))
                    });
                let Some((session, turn)) = restored else {
                    let session = QuizSession::new(
                        snapshot.mode.unwrap_or(QuizMode::Quiz),
                        snapshot.difficulty,
                    );
                    return self.finish(&session, EndReason::NothingToResume, reporter);
                };
                tracing::info!(session = %session.id(), "session resumed from snapshot");
                (session, turn)
            }
        };

        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut run = Run {
            driver: self,
            reporter,
            session,
            timers: Timers::default(),
            events_tx,
        };
        run.show_turn(&first_turn)?;

        let end = loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    None => {
                        if run.session.current_turn().is_some() {
                            run.session.pause();
                            run.timers.cancel();
                            run.save_snapshot()?;
                            break EndReason::Interrupted;
                        }
                        run.session.stop();
                        break EndReason::Stopped;
                    }
                    Some(UserInput::Stop) => {
                        run.timers.cancel();
                        run.session.stop();
                        break EndReason::Stopped;
                    }
                    Some(UserInput::Pause) => run.pause()?,
                    Some(UserInput::Resume) => run.resume()?,
                    Some(UserInput::Answer(value)) => run.answer(Some(value), &mut progress).await?,
                    Some(UserInput::Choose(index)) => {
                        let value = run
                            .session
                            .current_turn()
                            .and_then(|turn| turn.options.get(index).copied());
                        if let Some(value) = value {
                            run.session.select(value);
                            run.answer(Some(value), &mut progress).await?;
                        }
                    }
                },
                Some(event) = events.recv() => match event {
                    TimerEvent::Tick(generation) => {
                        match run.session.tick(generation, &mut progress, self.clock.as_ref()) {
                            TickOutcome::Ignored => {}
                            TickOutcome::Remaining(left) => reporter.on_tick(left),
                            TickOutcome::Expired(outcome) => run.answered(outcome, &progress).await?,
                        }
                    }
                    TimerEvent::Advance(generation) => {
                        match run.session.advance(generation, &progress, &mut rng) {
                            AdvanceOutcome::Stale => {}
                            AdvanceOutcome::Next(turn) => run.show_turn(&turn)?,
                            AdvanceOutcome::Completed(kind) => break EndReason::Completed(kind),
                        }
                    }
                },
            }
        };

        run.timers.cancel();
        self.finish(&run.session, end, reporter)
    }

    fn finish(
        &self,
        session: &QuizSession,
        end: EndReason,
        reporter: &dyn SessionReporter,
    ) -> Result<SessionSummary> {
        if end != EndReason::Interrupted {
            storage::clear_quiz_state(self.store.as_ref()).context("failed to clear quiz state")?;
        }
        let summary = SessionSummary::of(session, end);
        tracing::info!(
            session = %summary.session_id,
            answered = summary.questions_answered,
            score = summary.score,
            end = ?summary.end,
            "session ended"
        );
        reporter.on_complete(&summary);
        Ok(summary)
    }
}

/// State of one in-progress run.
struct Run<'a> {
    driver: &'a SessionDriver,
    reporter: &'a dyn SessionReporter,
    session: QuizSession,
    timers: Timers,
    events_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl Run<'_> {
    fn save_snapshot(&self) -> Result<()> {
        storage::save_quiz_state(self.driver.store.as_ref(), &self.session.snapshot())
            .context("failed to save quiz state")
    }

    fn show_turn(&mut self, turn: &Turn) -> Result<()> {
        self.save_snapshot()?;
        self.reporter.on_question(&self.session, turn);
        if self.session.is_paused() {
            self.reporter.on_paused();
        } else {
            self.timers
                .start_countdown(self.session.generation(), self.driver.config.tick, &self.events_tx);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if self.session.pause() {
            self.timers.cancel();
            self.save_snapshot()?;
            self.reporter.on_paused();
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if !self.session.resume() {
            return Ok(());
        }
        self.save_snapshot()?;
        if let Some(turn) = self.session.current_turn() {
            self.reporter.on_resumed(turn);
        }
        self.timers
            .start_countdown(self.session.generation(), self.driver.config.tick, &self.events_tx);
        Ok(())
    }

    async fn answer(&mut self, value: Option<u32>, progress: &mut UserProgress) -> Result<()> {
        let Some(outcome) = self
            .session
            .submit(value, progress, self.driver.clock.as_ref())
        else {
            return Ok(());
        };
        self.answered(outcome, progress).await
    }

    async fn answered(&mut self, outcome: AnswerOutcome, progress: &UserProgress) -> Result<()> {
        self.timers.cancel();
        storage::save_progress(self.driver.store.as_ref(), progress)
            .context("failed to save progress")?;
        self.save_snapshot()?;

        self.reporter.on_answer(&outcome, progress);
        if !outcome.unlocked.is_empty() {
            tracing::info!(unlocked = ?outcome.unlocked, "achievements unlocked");
            self.reporter.on_achievements(&outcome.unlocked);
        }
        self.narrate(&outcome).await;

        self.timers.schedule_advance(
            self.session.generation(),
            self.driver.config.advance_delay,
            &self.events_tx,
        );
        Ok(())
    }

    /// Read the full formula aloud once the answer is on screen.
    async fn narrate(&self, outcome: &AnswerOutcome) {
        let config = &self.driver.config;
        let narrator = &self.driver.narrator;
        if !config.speech_enabled || !narrator.is_supported() {
            return;
        }
        let q = outcome.question;
        let utterance = Utterance::new(
            formula_text(q.multiplicand, q.multiplier, config.locale),
            config.locale.voice(),
        );
        if let Err(e) = narrator.speak(&utterance).await {
            tracing::warn!(narrator = narrator.name(), "speech failed: {e:#}");
        }
    }
}
