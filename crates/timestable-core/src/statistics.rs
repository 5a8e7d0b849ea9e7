//! Aggregate views over a progress snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementId;
use crate::model::UserProgress;

/// Headline numbers shown by `stats` and the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Accuracy rounded to a whole percentage.
    pub accuracy_percent: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub consecutive_days: u32,
    pub wrong_questions: usize,
    pub daily_questions_answered: u32,
    pub daily_target: u32,
    pub daily_task_completed: bool,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
}

impl ProgressSummary {
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            total_questions: progress.total_questions,
            correct_answers: progress.correct_answers,
            accuracy_percent: (progress.accuracy() * 100.0).round() as u32,
            streak: progress.streak,
            best_streak: progress.best_streak,
            consecutive_days: progress.consecutive_days,
            wrong_questions: progress.wrong_questions.len(),
            daily_questions_answered: progress.daily_questions_answered,
            daily_target: progress.daily_target,
            daily_task_completed: progress.daily_task_completed,
            achievements_unlocked: progress.achievements.len(),
            achievements_total: AchievementId::ALL.len(),
        }
    }

    /// Daily progress in `0.0..=1.0`.
    pub fn daily_fraction(&self) -> f64 {
        if self.daily_target == 0 {
            return 1.0;
        }
        (self.daily_questions_answered as f64 / self.daily_target as f64).min(1.0)
    }
}

/// Wrong-question counts per multiplicand, most-missed first.
///
/// Ties are broken by the smaller table.
pub fn wrong_by_table(progress: &UserProgress) -> Vec<(u32, usize)> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for wrong in &progress.wrong_questions {
        *counts.entry(wrong.multiplicand).or_default() += 1;
    }
    let mut tables: Vec<_> = counts.into_iter().collect();
    tables.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    tables
}
