//! The progress reducer.
//!
//! [`update_progress`] is the only transition that records an answered
//! question. It is pure: the caller supplies today's date and persists the
//! returned snapshot.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::achievements::{unlock_achievements, AchievementId};
use crate::model::{Mode, Question, UserProgress, WrongQuestion, MAX_WRONG_QUESTIONS};

/// The outcome of one answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerEvent {
    pub was_correct: bool,
    /// Recorded in the wrong-question list when the answer was wrong.
    pub wrong_question: Option<WrongQuestion>,
    /// `(multiplicand, multiplier)` of the answered question.
    pub pair: (u32, u32),
    pub mode: Mode,
}

impl AnswerEvent {
    /// Build the event for `answer` (`None` = ran out of time).
    pub fn from_answer(question: &Question, answer: Option<u32>, mode: Mode, timestamp: i64) -> Self {
        let was_correct = question.is_correct(answer);
        Self {
            was_correct,
            wrong_question: (!was_correct)
                .then(|| WrongQuestion::from_question(question, answer, timestamp)),
            pair: question.key(),
            mode,
        }
    }
}

/// A new progress snapshot plus what it unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub progress: UserProgress,
    pub unlocked: BTreeSet<AchievementId>,
}

/// Fold one answered question into `progress`.
pub fn update_progress(progress: &UserProgress, event: &AnswerEvent, today: NaiveDate) -> ProgressUpdate {
    let mut next = progress.clone();
    let new_day = progress.last_play_date != Some(today);
    let counts = event.mode.counts_toward_daily_target();

    next.total_questions += 1;

    if new_day {
        next.daily_questions_answered = u32::from(counts);
        next.daily_task_completed = false;
    } else if counts {
        next.daily_questions_answered += 1;
    }
    next.daily_task_completed = next.daily_questions_answered >= next.daily_target;

    if event.was_correct {
        next.correct_answers += 1;
        next.streak += 1;
        next.best_streak = next.best_streak.max(next.streak);
        if event.mode == Mode::Review {
            let (multiplicand, multiplier) = event.pair;
            next.wrong_questions
                .retain(|w| w.key() != (multiplicand, multiplier));
        }
    } else {
        next.streak = 0;
        if let Some(wrong) = &event.wrong_question {
            if !next.has_wrong_question(wrong.multiplicand, wrong.multiplier) {
                next.wrong_questions.push(wrong.clone());
                if next.wrong_questions.len() > MAX_WRONG_QUESTIONS {
                    let excess = next.wrong_questions.len() - MAX_WRONG_QUESTIONS;
                    next.wrong_questions.drain(..excess);
                }
            }
        }
    }

    if new_day {
        let yesterday = today.pred_opt();
        next.consecutive_days = if yesterday.is_some() && progress.last_play_date == yesterday {
            progress.consecutive_days + 1
        } else {
            1
        };
        next.last_play_date = Some(today);
    }

    let unlocked = unlock_achievements(&mut next);
    if !unlocked.is_empty() {
        tracing::debug!(?unlocked, "achievements unlocked");
    }

    ProgressUpdate {
        progress: next,
        unlocked,
    }
}

/// Drop every wrong-question entry for `(multiplicand, multiplier)`.
pub fn remove_from_wrong_questions(
    progress: &UserProgress,
    multiplicand: u32,
    multiplier: u32,
) -> UserProgress {
    let mut next = progress.clone();
    next.wrong_questions
        .retain(|w| w.key() != (multiplicand, multiplier));
    next
}
