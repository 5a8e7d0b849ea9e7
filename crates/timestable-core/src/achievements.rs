//! Achievement catalog and evaluator.
//!
//! Every check runs against the same progress snapshot, so several
//! achievements can unlock in a single turn.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::UserProgress;

/// Identifier of a known achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "first_correct")]
    FirstCorrect,
    #[serde(rename = "streak_5")]
    Streak5,
    #[serde(rename = "streak_10")]
    Streak10,
    #[serde(rename = "streak_20")]
    Streak20,
    #[serde(rename = "daily_3")]
    Daily3,
    #[serde(rename = "daily_7")]
    Daily7,
    #[serde(rename = "accuracy_90")]
    Accuracy90,
    #[serde(rename = "questions_100")]
    Questions100,
    #[serde(rename = "daily_task_complete")]
    DailyTaskComplete,
}

impl AchievementId {
    pub const ALL: [AchievementId; 9] = [
        AchievementId::FirstCorrect,
        AchievementId::Streak5,
        AchievementId::Streak10,
        AchievementId::Streak20,
        AchievementId::Daily3,
        AchievementId::Daily7,
        AchievementId::Accuracy90,
        AchievementId::Questions100,
        AchievementId::DailyTaskComplete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstCorrect => "first_correct",
            AchievementId::Streak5 => "streak_5",
            AchievementId::Streak10 => "streak_10",
            AchievementId::Streak20 => "streak_20",
            AchievementId::Daily3 => "daily_3",
            AchievementId::Daily7 => "daily_7",
            AchievementId::Accuracy90 => "accuracy_90",
            AchievementId::Questions100 => "questions_100",
            AchievementId::DailyTaskComplete => "daily_task_complete",
        }
    }

    /// Catalog entry for this id.
    pub fn info(&self) -> &'static Achievement {
        CATALOG
            .iter()
            .find(|a| a.id == *self)
            .unwrap_or(&CATALOG[0])
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AchievementId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown achievement: {s}"))
    }
}

/// Static description of an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub id: AchievementId,
    /// Fallback English title; localized titles live in the message catalogs.
    pub title: &'static str,
    pub description: &'static str,
    /// Icon name used by the web front end.
    pub icon: &'static str,
}

impl Achievement {
    /// Message-catalog key of the localized name.
    pub fn name_key(&self) -> String {
        format!("achievements.{}.name", self.id)
    }

    /// Message-catalog key of the localized description.
    pub fn description_key(&self) -> String {
        format!("achievements.{}.description", self.id)
    }
}

pub static CATALOG: [Achievement; 9] = [
    Achievement {
        id: AchievementId::FirstCorrect,
        title: "First Steps",
        description: "Answer a question correctly for the first time",
        icon: "Sprout",
    },
    Achievement {
        id: AchievementId::Streak5,
        title: "Warming Up",
        description: "Answer 5 questions correctly in a row",
        icon: "Flame",
    },
    Achievement {
        id: AchievementId::Streak10,
        title: "Unstoppable",
        description: "Answer 10 questions correctly in a row",
        icon: "Zap",
    },
    Achievement {
        id: AchievementId::Streak20,
        title: "In the Zone",
        description: "Answer 20 questions correctly in a row",
        icon: "Gem",
    },
    Achievement {
        id: AchievementId::Daily3,
        title: "Persistent",
        description: "Practice 3 days in a row",
        icon: "Calendar",
    },
    Achievement {
        id: AchievementId::Daily7,
        title: "Star of the Week",
        description: "Practice 7 days in a row",
        icon: "Star",
    },
    Achievement {
        id: AchievementId::Accuracy90,
        title: "Sharpshooter",
        description: "Reach 90% accuracy",
        icon: "Target",
    },
    Achievement {
        id: AchievementId::Questions100,
        title: "Centurion",
        description: "Answer 100 questions in total",
        icon: "Trophy",
    },
    Achievement {
        id: AchievementId::DailyTaskComplete,
        title: "Daily Champion",
        description: "Complete today's question target",
        icon: "CheckCircle",
    },
];

/// Evaluate every threshold against `progress` and return the ids that are
/// satisfied but not yet unlocked.
pub fn check_achievements(progress: &UserProgress) -> BTreeSet<AchievementId> {
    let reached = [
        (AchievementId::FirstCorrect, progress.correct_answers >= 1),
        (AchievementId::Streak5, progress.streak >= 5),
        (AchievementId::Streak10, progress.streak >= 10),
        (AchievementId::Streak20, progress.streak >= 20),
        (AchievementId::Daily3, progress.consecutive_days >= 3),
        (AchievementId::Daily7, progress.consecutive_days >= 7),
        (
            AchievementId::Accuracy90,
            progress.total_questions >= 10 && progress.accuracy() >= 0.9,
        ),
        (AchievementId::Questions100, progress.total_questions >= 100),
        (AchievementId::DailyTaskComplete, progress.daily_task_completed),
    ];

    reached
        .into_iter()
        .filter(|(id, ok)| *ok && !progress.achievements.contains(id))
        .map(|(id, _)| id)
        .collect()
}

/// Run [`check_achievements`] and merge the result into `progress`.
///
/// Returns the newly unlocked ids.
pub fn unlock_achievements(progress: &mut UserProgress) -> BTreeSet<AchievementId> {
    let unlocked = check_achievements(progress);
    progress.achievements.extend(unlocked.iter().copied());
    unlocked
}

/// Deserialize an achievement list, dropping ids this build does not know.
pub(crate) fn deserialize_known<'de, D>(d: D) -> Result<BTreeSet<AchievementId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(d)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(|s| match s.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("dropping unknown achievement id {s:?}");
                None
            }
        })
        .collect())
}
