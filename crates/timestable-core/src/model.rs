//! Core data model types for timestable.
//!
//! These are the types persisted in the store and passed between the
//! generators, the progress reducer, and the session controller.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::achievements::{self, AchievementId};

/// Maximum number of entries kept in the wrong-question list.
pub const MAX_WRONG_QUESTIONS: usize = 100;

/// Default number of questions that completes the daily task.
pub const DEFAULT_DAILY_TARGET: u32 = 10;

/// A single multiplication question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub multiplicand: u32,
    pub multiplier: u32,
    pub correct_answer: u32,
}

impl Question {
    pub fn new(multiplicand: u32, multiplier: u32) -> Self {
        Self {
            multiplicand,
            multiplier,
            correct_answer: multiplicand * multiplier,
        }
    }

    /// Identity key shared with [`WrongQuestion::key`].
    pub fn key(&self) -> (u32, u32) {
        (self.multiplicand, self.multiplier)
    }

    /// `None` is a timed-out turn and never matches.
    pub fn is_correct(&self, answer: Option<u32>) -> bool {
        answer == Some(self.correct_answer)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.multiplicand, self.multiplier)
    }
}

/// A question the user answered incorrectly, kept for review mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongQuestion {
    pub multiplicand: u32,
    pub multiplier: u32,
    /// The submitted answer; 0 when the countdown ran out.
    pub user_answer: u32,
    pub correct_answer: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl WrongQuestion {
    pub fn from_question(question: &Question, answer: Option<u32>, timestamp: i64) -> Self {
        Self {
            multiplicand: question.multiplicand,
            multiplier: question.multiplier,
            user_answer: answer.unwrap_or(0),
            correct_answer: question.correct_answer,
            timestamp,
        }
    }

    pub fn key(&self) -> (u32, u32) {
        (self.multiplicand, self.multiplier)
    }

    pub fn to_question(&self) -> Question {
        Question {
            multiplicand: self.multiplicand,
            multiplier: self.multiplier,
            correct_answer: self.correct_answer,
        }
    }
}

/// Difficulty tier bounding multiplicand and multiplier draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn multiplicand_range(&self) -> RangeInclusive<u32> {
        self.range()
    }

    pub fn multiplier_range(&self) -> RangeInclusive<u32> {
        self.range()
    }

    /// Largest product reachable in this tier.
    pub fn max_product(&self) -> u32 {
        self.multiplicand_range().end() * self.multiplier_range().end()
    }

    /// Whether both factors of `question` lie in this tier.
    pub fn contains(&self, question: &Question) -> bool {
        self.multiplicand_range().contains(&question.multiplicand)
            && self.multiplier_range().contains(&question.multiplier)
    }

    fn range(&self) -> RangeInclusive<u32> {
        match self {
            Difficulty::Beginner => 1..=9,
            Difficulty::Advanced => 11..=19,
            Difficulty::Expert => 21..=99,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Advanced => write!(f, "advanced"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" | "easy" => Ok(Difficulty::Beginner),
            "advanced" | "medium" => Ok(Difficulty::Advanced),
            "expert" | "hard" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Top-level application mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Learn,
    Quiz,
    Review,
}

impl Mode {
    /// Only fresh quiz questions count toward the daily target.
    pub fn counts_toward_daily_target(&self) -> bool {
        matches!(self, Mode::Quiz)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Learn => write!(f, "learn"),
            Mode::Quiz => write!(f, "quiz"),
            Mode::Review => write!(f, "review"),
        }
    }
}

/// The two modes a timed session can run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Quiz,
    Review,
}

impl From<QuizMode> for Mode {
    fn from(mode: QuizMode) -> Self {
        match mode {
            QuizMode::Quiz => Mode::Quiz,
            QuizMode::Review => Mode::Review,
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Mode::from(*self).fmt(f)
    }
}

/// Cumulative per-profile statistics.
///
/// Field names serialize in camelCase so the stored blob keeps the layout the
/// web version wrote under `multiplicationProgress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    /// Calendar date of the last answered question.
    #[serde(default, with = "play_date")]
    pub last_play_date: Option<NaiveDate>,
    #[serde(default)]
    pub consecutive_days: u32,
    #[serde(default)]
    pub wrong_questions: Vec<WrongQuestion>,
    #[serde(default, deserialize_with = "achievements::deserialize_known")]
    pub achievements: BTreeSet<AchievementId>,
    #[serde(default)]
    pub daily_questions_answered: u32,
    #[serde(default = "default_daily_target")]
    pub daily_target: u32,
    #[serde(default)]
    pub daily_task_completed: bool,
}

fn default_daily_target() -> u32 {
    DEFAULT_DAILY_TARGET
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            total_questions: 0,
            correct_answers: 0,
            streak: 0,
            best_streak: 0,
            last_play_date: None,
            consecutive_days: 0,
            wrong_questions: Vec::new(),
            achievements: BTreeSet::new(),
            daily_questions_answered: 0,
            daily_target: DEFAULT_DAILY_TARGET,
            daily_task_completed: false,
        }
    }
}

impl UserProgress {
    /// Fraction of correct answers in `0.0..=1.0`; 0 before the first answer.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.total_questions as f64
        }
    }

    /// Reset the daily counters when the last play date is not `today`.
    ///
    /// Returns `true` if anything was reset.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_play_date == Some(today) {
            return false;
        }
        let changed = self.daily_questions_answered != 0 || self.daily_task_completed;
        self.daily_questions_answered = 0;
        self.daily_task_completed = false;
        changed
    }

    /// Change the daily target, keeping the completion flag consistent.
    pub fn set_daily_target(&mut self, target: u32) {
        self.daily_target = target.max(1);
        self.daily_task_completed = self.daily_questions_answered >= self.daily_target;
    }

    pub fn has_wrong_question(&self, multiplicand: u32, multiplier: u32) -> bool {
        self.wrong_questions
            .iter()
            .any(|w| w.key() == (multiplicand, multiplier))
    }

    /// Repair a blob read from storage so the list and counter invariants hold.
    ///
    /// Duplicate wrong questions keep their first entry and only the newest
    /// [`MAX_WRONG_QUESTIONS`] survive. Returns `true` if anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.clone();

        let mut seen = HashSet::new();
        self.wrong_questions.retain(|w| seen.insert(w.key()));
        if self.wrong_questions.len() > MAX_WRONG_QUESTIONS {
            let excess = self.wrong_questions.len() - MAX_WRONG_QUESTIONS;
            self.wrong_questions.drain(..excess);
        }

        self.correct_answers = self.correct_answers.min(self.total_questions);
        self.best_streak = self.best_streak.max(self.streak);
        self.daily_target = self.daily_target.max(1);
        self.daily_task_completed = self.daily_questions_answered >= self.daily_target;

        *self != before
    }

    /// Whether today's daily task is already done.
    pub fn daily_target_met(&self, today: NaiveDate) -> bool {
        self.last_play_date == Some(today) && self.daily_task_completed
    }
}

/// Serde adapter for the calendar date of the last session.
///
/// Writes `YYYY-MM-DD` (or an empty string when unset). Reads that format as
/// well as the `Sat Oct 17 2026` form produced by JavaScript's
/// `Date.toDateString()`; anything else is treated as "never played".
mod play_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO_FORMAT: &str = "%Y-%m-%d";
    const LEGACY_FORMAT: &str = "%a %b %d %Y";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(ISO_FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let parsed = NaiveDate::parse_from_str(raw, ISO_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw, LEGACY_FORMAT))
            .ok();
        if parsed.is_none() {
            tracing::warn!("ignoring unparseable last play date: {raw:?}");
        }
        parsed
    }
}
