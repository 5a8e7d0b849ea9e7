//! The quiz/review session state machine.
//!
//! A [`QuizSession`] moves through `Idle → Asking → Answered → (Idle | Asking)`
//! with an orthogonal paused bit. It holds no timers: the caller schedules
//! countdown ticks and the deferred advance, tagging each with the
//! [`QuizSession::generation`] current when it was scheduled. Any transition
//! that invalidates those callbacks bumps the generation, so late callbacks
//! come back as [`TickOutcome::Ignored`] / [`AdvanceOutcome::Stale`].

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::achievements::AchievementId;
use crate::clock::Clock;
use crate::distractors::{generate_answer_options, OPTION_COUNT};
use crate::generator::{generate_random_question, generate_review_question};
use crate::model::{Difficulty, Question, QuizMode, UserProgress};
use crate::progress::{update_progress, AnswerEvent};

/// Default countdown per question, in seconds.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 10;

/// One in-flight question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub question: Question,
    pub options: [u32; OPTION_COUNT],
    /// The highlighted option, if any.
    pub selected: Option<u32>,
    pub time_left: u32,
}

/// What happened when a turn was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question: Question,
    pub options: [u32; OPTION_COUNT],
    /// `None` when the countdown ran out.
    pub answer: Option<u32>,
    pub correct: bool,
    pub unlocked: BTreeSet<AchievementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Asking(Turn),
    Answered(AnswerOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started(Turn),
    /// Review was requested with an empty wrong-question list.
    NothingToReview,
    /// A quiz was requested after today's target was already reached.
    DailyTargetMet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale generation, paused, or not asking.
    Ignored,
    Remaining(u32),
    /// The countdown hit zero and the turn was submitted without an answer.
    Expired(AnswerOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    DailyTarget,
    ReviewEmptied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next(Turn),
    Completed(CompletionKind),
    Stale,
}

/// A timed quiz or review session.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    mode: QuizMode,
    difficulty: Difficulty,
    phase: Phase,
    paused: bool,
    generation: u64,
    questions_answered: u32,
    score: u32,
    countdown_secs: u32,
}

impl QuizSession {
    pub fn new(mode: QuizMode, difficulty: Difficulty) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            difficulty,
            phase: Phase::Idle,
            paused: false,
            generation: 0,
            questions_answered: 0,
            score: 0,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
        }
    }

    /// Override the per-question countdown (at least one second).
    pub fn with_countdown(mut self, secs: u32) -> Self {
        self.countdown_secs = secs.max(1);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn questions_answered(&self) -> u32 {
        self.questions_answered
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    /// The turn being asked, if any.
    pub fn current_turn(&self) -> Option<&Turn> {
        match &self.phase {
            Phase::Asking(turn) => Some(turn),
            _ => None,
        }
    }

    /// Leave `Idle` and ask the first question.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        progress: &UserProgress,
        clock: &dyn Clock,
        rng: &mut R,
    ) -> StartOutcome {
        match self.mode {
            QuizMode::Review if progress.wrong_questions.is_empty() => {
                tracing::debug!("review requested with nothing to review");
                return StartOutcome::NothingToReview;
            }
            QuizMode::Quiz if progress.daily_target_met(clock.today()) => {
                tracing::debug!("daily target already met");
                return StartOutcome::DailyTargetMet;
            }
            _ => {}
        }
        tracing::info!(session = %self.id, mode = %self.mode, difficulty = %self.difficulty, "session started");
        match self.ask(progress, rng) {
            Some(turn) => StartOutcome::Started(turn),
            None => StartOutcome::NothingToReview,
        }
    }

    /// Highlight an option without submitting it.
    pub fn select(&mut self, answer: u32) -> bool {
        if self.paused {
            return false;
        }
        match &mut self.phase {
            Phase::Asking(turn) if turn.options.contains(&answer) => {
                turn.selected = Some(answer);
                true
            }
            _ => false,
        }
    }

    /// One countdown second elapsed for the turn tagged `generation`.
    pub fn tick(
        &mut self,
        generation: u64,
        progress: &mut UserProgress,
        clock: &dyn Clock,
    ) -> TickOutcome {
        if generation != self.generation || self.paused {
            return TickOutcome::Ignored;
        }
        let Phase::Asking(turn) = &mut self.phase else {
            return TickOutcome::Ignored;
        };
        turn.time_left = turn.time_left.saturating_sub(1);
        if turn.time_left > 0 {
            return TickOutcome::Remaining(turn.time_left);
        }
        tracing::debug!("countdown expired");
        match self.submit(None, progress, clock) {
            Some(outcome) => TickOutcome::Expired(outcome),
            None => TickOutcome::Ignored,
        }
    }

    /// Answer the current turn; `None` records a timeout.
    ///
    /// Returns `None` when there is no unpaused turn to answer.
    pub fn submit(
        &mut self,
        answer: Option<u32>,
        progress: &mut UserProgress,
        clock: &dyn Clock,
    ) -> Option<AnswerOutcome> {
        if self.paused {
            return None;
        }
        let Phase::Asking(turn) = &self.phase else {
            return None;
        };
        let question = turn.question;
        let options = turn.options;

        let event = AnswerEvent::from_answer(&question, answer, self.mode.into(), clock.now_millis());
        let update = update_progress(progress, &event, clock.today());
        *progress = update.progress;

        self.questions_answered += 1;
        if event.was_correct {
            self.score += 1;
        }
        self.generation += 1;

        let outcome = AnswerOutcome {
            question,
            options,
            answer,
            correct: event.was_correct,
            unlocked: update.unlocked,
        };
        tracing::debug!(%question, ?answer, correct = outcome.correct, "answer recorded");
        self.phase = Phase::Answered(outcome.clone());
        Some(outcome)
    }

    /// Move on after the answer display delay scheduled at `generation`.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        generation: u64,
        progress: &UserProgress,
        rng: &mut R,
    ) -> AdvanceOutcome {
        if generation != self.generation || !matches!(self.phase, Phase::Answered(_)) {
            return AdvanceOutcome::Stale;
        }
        let completed = match self.mode {
            QuizMode::Quiz if progress.daily_task_completed => Some(CompletionKind::DailyTarget),
            QuizMode::Review if progress.wrong_questions.is_empty() => {
                Some(CompletionKind::ReviewEmptied)
            }
            _ => None,
        };
        if let Some(kind) = completed {
            self.finish();
            tracing::info!(
                session = %self.id,
                answered = self.questions_answered,
                score = self.score,
                ?kind,
                "session completed"
            );
            return AdvanceOutcome::Completed(kind);
        }
        match self.ask(progress, rng) {
            Some(turn) => AdvanceOutcome::Next(turn),
            None => {
                self.finish();
                AdvanceOutcome::Completed(CompletionKind::ReviewEmptied)
            }
        }
    }

    /// Freeze the countdown. Only meaningful while asking.
    pub fn pause(&mut self) -> bool {
        if self.paused || !matches!(self.phase, Phase::Asking(_)) {
            return false;
        }
        self.paused = true;
        self.generation += 1;
        tracing::debug!(session = %self.id, "paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.generation += 1;
        tracing::debug!(session = %self.id, "resumed");
        true
    }

    /// Abandon the session. Pending callbacks become stale.
    pub fn stop(&mut self) {
        self.finish();
        tracing::info!(session = %self.id, answered = self.questions_answered, "session stopped");
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        let turn = self.current_turn();
        QuizSnapshot {
            session_id: self.id,
            mode: Some(self.mode),
            difficulty: self.difficulty,
            is_paused: self.paused,
            current_question: turn.map(|t| t.question),
            answer_options: turn.map(|t| t.options.to_vec()).unwrap_or_default(),
            selected_answer: turn.and_then(|t| t.selected),
            time_left: turn.map_or(self.countdown_secs, |t| t.time_left),
            questions_answered: self.questions_answered,
            quiz_score: self.score,
        }
    }

    /// Rebuild a session from a persisted snapshot.
    ///
    /// Returns `None` unless the snapshot holds a complete in-flight turn.
    pub fn restore(snapshot: &QuizSnapshot, countdown_secs: u32) -> Option<Self> {
        let mode = snapshot.mode?;
        let question = snapshot.current_question?;
        let options: [u32; OPTION_COUNT] = snapshot.answer_options.as_slice().try_into().ok()?;
        let in_some_tier = Difficulty::ALL.iter().any(|d| d.contains(&question));
        let product = question.multiplicand.checked_mul(question.multiplier);
        if !in_some_tier
            || product != Some(question.correct_answer)
            || !options.contains(&question.correct_answer)
        {
            tracing::warn!("discarding inconsistent quiz snapshot");
            return None;
        }
        let countdown_secs = countdown_secs.max(1);
        let time_left = snapshot.time_left.clamp(1, countdown_secs);
        let selected = snapshot.selected_answer.filter(|a| options.contains(a));

        Some(Self {
            id: snapshot.session_id,
            mode,
            difficulty: snapshot.difficulty,
            phase: Phase::Asking(Turn {
                question,
                options,
                selected,
                time_left,
            }),
            paused: snapshot.is_paused,
            generation: 0,
            questions_answered: snapshot.questions_answered,
            score: snapshot.quiz_score.min(snapshot.questions_answered),
            countdown_secs,
        })
    }

    fn ask<R: Rng + ?Sized>(&mut self, progress: &UserProgress, rng: &mut R) -> Option<Turn> {
        let question = match self.mode {
            QuizMode::Quiz => generate_random_question(self.difficulty, rng),
            QuizMode::Review => generate_review_question(&progress.wrong_questions, rng)?,
        };
        // Review questions may come from any tier.
        let option_tier = match self.mode {
            QuizMode::Quiz => self.difficulty,
            QuizMode::Review => tier_for(&question),
        };
        let turn = Turn {
            question,
            options: generate_answer_options(question.correct_answer, option_tier, rng),
            selected: None,
            time_left: self.countdown_secs,
        };
        self.paused = false;
        self.generation += 1;
        self.phase = Phase::Asking(turn.clone());
        tracing::debug!(%question, generation = self.generation, "asking");
        Some(turn)
    }

    fn finish(&mut self) {
        self.phase = Phase::Idle;
        self.paused = false;
        self.generation += 1;
    }
}

/// The smallest tier whose product bound covers `question`.
fn tier_for(question: &Question) -> Difficulty {
    Difficulty::ALL
        .into_iter()
        .find(|d| question.correct_answer <= d.max_product())
        .unwrap_or(Difficulty::Expert)
}

/// Persisted form of an in-flight session, stored under
/// `multiplicationQuizState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    #[serde(default = "Uuid::new_v4")]
    pub session_id: Uuid,
    #[serde(default)]
    pub mode: Option<QuizMode>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub current_question: Option<Question>,
    #[serde(default)]
    pub answer_options: Vec<u32>,
    #[serde(default)]
    pub selected_answer: Option<u32>,
    #[serde(default = "default_time_left")]
    pub time_left: u32,
    #[serde(default)]
    pub questions_answered: u32,
    #[serde(default)]
    pub quiz_score: u32,
}

fn default_time_left() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}
