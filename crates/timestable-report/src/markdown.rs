//! Markdown progress summary.

use timestable_core::achievements::AchievementId;
use timestable_core::model::UserProgress;
use timestable_core::statistics::{wrong_by_table, ProgressSummary};

/// Render a markdown summary of `progress`.
pub fn generate_markdown(progress: &UserProgress) -> String {
    let s = ProgressSummary::from_progress(progress);
    let mut md = String::new();

    md.push_str("## timestable progress\n\n");
    md.push_str(&format!(
        "**Summary:** {} questions, {}% correct, streak {} (best {}), {} day(s) in a row\n\n",
        s.total_questions, s.accuracy_percent, s.streak, s.best_streak, s.consecutive_days
    ));
    md.push_str(&format!(
        "**Today:** {}/{}{}\n\n",
        s.daily_questions_answered,
        s.daily_target,
        if s.daily_task_completed { " (done)" } else { "" }
    ));

    md.push_str(&format!(
        "### Achievements ({}/{})\n\n",
        s.achievements_unlocked, s.achievements_total
    ));
    for id in AchievementId::ALL {
        let info = id.info();
        let mark = if progress.achievements.contains(&id) { "x" } else { " " };
        md.push_str(&format!("- [{mark}] **{}**: {}\n", info.title, info.description));
    }
    md.push('\n');

    if progress.wrong_questions.is_empty() {
        md.push_str("Nothing to review.\n");
        return md;
    }

    md.push_str("### To review\n\n");
    md.push_str("| Question | Your answer | Correct |\n");
    md.push_str("|----------|-------------|---------|\n");
    for w in &progress.wrong_questions {
        let answer = match w.user_answer {
            0 => "-".to_string(),
            n => n.to_string(),
        };
        md.push_str(&format!(
            "| {} × {} | {} | {} |\n",
            w.multiplicand, w.multiplier, answer, w.correct_answer
        ));
    }
    md.push('\n');

    let tables: Vec<String> = wrong_by_table(progress)
        .into_iter()
        .map(|(table, count)| format!("{table}× ({count})"))
        .collect();
    md.push_str(&format!("**Most missed:** {}\n", tables.join(", ")));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use timestable_core::model::{Question, WrongQuestion};

    #[test]
    fn markdown_lists_achievements_and_wrong_questions() {
        let mut progress = UserProgress {
            total_questions: 4,
            correct_answers: 3,
            wrong_questions: vec![
                WrongQuestion::from_question(&Question::new(6, 7), Some(48), 0),
                WrongQuestion::from_question(&Question::new(6, 9), None, 0),
            ],
            ..Default::default()
        };
        progress.achievements.insert(AchievementId::FirstCorrect);

        let md = generate_markdown(&progress);
        assert!(md.contains("4 questions, 75% correct"));
        assert!(md.contains("### Achievements (1/9)"));
        assert!(md.contains("- [x] **"));
        assert!(md.contains("| 6 × 7 | 48 | 42 |"));
        assert!(md.contains("| 6 × 9 | - | 54 |"));
        assert!(md.contains("**Most missed:** 6× (2)"));
    }

    #[test]
    fn fresh_profile_has_nothing_to_review() {
        let md = generate_markdown(&UserProgress::default());
        assert!(md.contains("0 questions, 0% correct"));
        assert!(md.contains("Nothing to review."));
        assert!(!md.contains("### To review"));
    }
}
