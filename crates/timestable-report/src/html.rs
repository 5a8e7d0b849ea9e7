//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use timestable_core::achievements::AchievementId;
use timestable_core::model::UserProgress;
use timestable_core::statistics::{wrong_by_table, ProgressSummary};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn stat_card(html: &mut String, label: &str, value: &str) {
    html.push_str(&format!(
        "<div class=\"card\"><div class=\"value\">{}</div><div class=\"label\">{}</div></div>\n",
        html_escape(value),
        html_escape(label)
    ));
}

/// Generate an HTML report for a progress snapshot.
pub fn generate_html(progress: &UserProgress, generated_at: DateTime<Utc>) -> String {
    let summary = ProgressSummary::from_progress(progress);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>timestable progress report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n<h1>timestable progress report</h1>\n");
    let last_played = progress
        .last_play_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string());
    html.push_str(&format!(
        "<p class=\"meta\">Last played: <strong>{}</strong> | generated {}</p>\n",
        last_played,
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Stat cards
    html.push_str("<section class=\"dashboard\">\n<h2>Summary</h2>\n<div class=\"cards\">\n");
    stat_card(&mut html, "Questions", &summary.total_questions.to_string());
    stat_card(&mut html, "Accuracy", &format!("{}%", summary.accuracy_percent));
    stat_card(&mut html, "Current streak", &summary.streak.to_string());
    stat_card(&mut html, "Best streak", &summary.best_streak.to_string());
    stat_card(&mut html, "Days in a row", &summary.consecutive_days.to_string());
    stat_card(&mut html, "To review", &summary.wrong_questions.to_string());
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<p>Today: {} / {}{}</p>\n<div class=\"bar\"><div class=\"fill\" style=\"width: {:.0}%\"></div></div>\n",
        summary.daily_questions_answered,
        summary.daily_target,
        if summary.daily_task_completed { " (done)" } else { "" },
        summary.daily_fraction() * 100.0
    ));
    html.push_str("</section>\n");

    // Achievements
    html.push_str(&format!(
        "<section class=\"achievements\">\n<h2>Achievements ({}/{})</h2>\n<ul>\n",
        summary.achievements_unlocked, summary.achievements_total
    ));
    for id in AchievementId::ALL {
        let info = id.info();
        let (class, mark) = if progress.achievements.contains(&id) {
            ("unlocked", "&#x2714;")
        } else {
            ("locked", "&#x2716;")
        };
        html.push_str(&format!(
            "<li class=\"{class}\">{mark} <strong>{}</strong> <span class=\"meta\">{}</span></li>\n",
            html_escape(info.title),
            html_escape(info.description)
        ));
    }
    html.push_str("</ul>\n</section>\n");

    // Wrong questions
    html.push_str("<section class=\"review\">\n<h2>Questions to review</h2>\n");
    let tables = wrong_by_table(progress);
    if tables.is_empty() {
        html.push_str("<p>Nothing to review.</p>\n");
    } else {
        html.push_str(&generate_bar_chart(&tables));
        html.push_str("<table class=\"results-table\" id=\"wrong\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Your answer</th><th onclick=\"sortTable(2)\">Correct</th><th onclick=\"sortTable(3)\">When</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for w in &progress.wrong_questions {
            let your_answer = if w.user_answer == 0 {
                "timed out".to_string()
            } else {
                w.user_answer.to_string()
            };
            let when = DateTime::<Utc>::from_timestamp_millis(w.timestamp)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            html.push_str(&format!(
                "<tr><td>{} &times; {}</td><td class=\"fail\">{}</td><td class=\"pass\">{}</td><td>{}</td></tr>\n",
                w.multiplicand, w.multiplier, your_answer, w.correct_answer, when
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(progress).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(progress: &UserProgress, path: &Path) -> Result<()> {
    let html = generate_html(progress, Utc::now());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Horizontal bars of wrong-question counts per table.
fn generate_bar_chart(tables: &[(u32, usize)]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 80;
    let max_count = tables.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);

    let total_height = tables.len() * (bar_height + padding) + padding;
    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (table, count)) in tables.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = count * max_width / max_count;
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{} &times;</text>\n",
            label_width - 10,
            y + bar_height / 2,
            table
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#ef4444\" rx=\"4\"/>\n",
            label_width, y, width, bar_height
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --accent: #22c55e; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --accent: #16a34a; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(140px, 1fr)); gap: 1rem; }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; text-align: center; }
.card .value { font-size: 1.8rem; font-weight: bold; }
.card .label { color: #6b7280; font-size: 0.85rem; }
.bar { height: 12px; background: var(--border); border-radius: 6px; overflow: hidden; max-width: 480px; }
.bar .fill { height: 100%; background: var(--accent); }
ul { list-style: none; padding: 0; }
li { padding: 0.25rem 0; }
li.locked { opacity: 0.5; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('wrong');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use timestable_core::model::{Question, WrongQuestion};

    fn make_progress() -> UserProgress {
        let mut progress = UserProgress {
            total_questions: 20,
            correct_answers: 18,
            streak: 4,
            best_streak: 11,
            consecutive_days: 3,
            last_play_date: NaiveDate::from_ymd_opt(2026, 10, 18),
            daily_questions_answered: 6,
            wrong_questions: vec![
                WrongQuestion::from_question(&Question::new(7, 8), Some(54), 1_760_000_000_000),
                WrongQuestion::from_question(&Question::new(7, 6), None, 1_760_000_100_000),
            ],
            ..Default::default()
        };
        progress.achievements.insert(AchievementId::FirstCorrect);
        progress.achievements.insert(AchievementId::Streak10);
        progress
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_progress(), Utc::now());
        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("90%"));
        assert!(html.contains("Achievements (2/9)"));
        assert!(html.contains("7 &times; 8"));
        assert!(html.contains("timed out"));
        assert!(html.contains("Today: 6 / 10"));
        assert!(html.contains("2026-10-18"));
    }

    #[test]
    fn empty_progress_has_nothing_to_review() {
        let html = generate_html(&UserProgress::default(), Utc::now());
        assert!(html.contains("Nothing to review."));
        assert!(html.contains("never"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn cards_and_chart_are_one_element_per_line() {
        let html = generate_html(&make_progress(), Utc::now());
        assert!(html.contains(
            "<div class=\"card\"><div class=\"value\">11</div><div class=\"label\">Best streak</div></div>\n"
        ));
        let chart = generate_bar_chart(&[(7, 2), (3, 1)]);
        assert_eq!(chart.matches("<rect").count(), 2);
        assert!(chart.contains("width=\"400\""));
        assert!(chart.contains("width=\"200\""));
        assert!(chart.lines().all(|l| l.starts_with("<svg") || l.starts_with("  <") || l == "</svg>"));
    }

    #[test]
    fn raw_json_is_escaped() {
        let html = generate_html(&make_progress(), Utc::now());
        assert!(html.contains("&quot;totalQuestions&quot;: 20"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&make_progress(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
