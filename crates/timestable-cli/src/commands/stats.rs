//! The `timestable stats` command.

use anyhow::Result;

use timestable_core::statistics::{wrong_by_table, ProgressSummary};
use timestable_report::generate_markdown;

use crate::context::{AppContext, GlobalArgs};

/// How many tables the "most missed" line lists.
const MOST_MISSED_SHOWN: usize = 3;

pub fn execute(global: &GlobalArgs, format: String) -> Result<()> {
    let ctx = AppContext::load(global)?;
    let progress = ctx.progress();
    let summary = ProgressSummary::from_progress(&progress);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", generate_markdown(&progress));
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            use comfy_table::{Cell, Table};

            let m = &ctx.messages;
            let mut table = Table::new();
            let rows = [
                ("stats.totalQuestions", summary.total_questions.to_string()),
                ("stats.accuracy", format!("{}%", summary.accuracy_percent)),
                ("stats.streak", summary.streak.to_string()),
                ("stats.bestStreak", summary.best_streak.to_string()),
                ("stats.consecutiveDays", summary.consecutive_days.to_string()),
                ("stats.wrongQuestions", summary.wrong_questions.to_string()),
                (
                    "stats.dailyProgress",
                    format!("{}/{}", summary.daily_questions_answered, summary.daily_target),
                ),
            ];
            for (key, value) in rows {
                table.add_row(vec![Cell::new(m.t(key, &[])), Cell::new(value)]);
            }

            println!("{}", m.t("stats.title", &[]));
            println!("{table}");

            let missed = wrong_by_table(&progress);
            if !missed.is_empty() {
                let list = missed
                    .iter()
                    .take(MOST_MISSED_SHOWN)
                    .map(|(multiplicand, count)| format!("{multiplicand}× ({count})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{}: {list}", m.t("stats.mostMissed", &[]));
            }
        }
    }

    Ok(())
}
