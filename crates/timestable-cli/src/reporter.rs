//! Terminal rendering of session events.

use std::collections::BTreeSet;

use timestable_core::achievements::AchievementId;
use timestable_core::driver::{EndReason, SessionReporter, SessionSummary};
use timestable_core::model::{Difficulty, QuizMode, UserProgress};
use timestable_core::session::{AnswerOutcome, CompletionKind, QuizSession, Turn};

use crate::i18n::Messages;

const OPTION_LABELS: [char; 3] = ['a', 'b', 'c'];

/// Countdown values worth printing.
const ANNOUNCED_TICKS: [u32; 4] = [5, 3, 2, 1];

pub struct TerminalReporter<'a> {
    messages: &'a Messages,
    daily_target: u32,
}

impl<'a> TerminalReporter<'a> {
    pub fn new(messages: &'a Messages, daily_target: u32) -> Self {
        Self {
            messages,
            daily_target,
        }
    }

    pub fn difficulty_label(&self, difficulty: Difficulty) -> String {
        self.messages.t(&format!("difficulty.{difficulty}"), &[])
    }

    pub fn announce(&self, mode: QuizMode, difficulty: Difficulty) {
        let m = self.messages;
        println!("== {} ==", m.t("app.title", &[]));
        println!(
            "{}",
            m.t(
                "quiz.start",
                &[("mode", &mode), ("difficulty", &self.difficulty_label(difficulty))]
            )
        );
        println!("{}", m.t("quiz.prompt", &[]));
    }

    fn print_turn(&self, turn: &Turn) {
        let options: Vec<String> = OPTION_LABELS
            .iter()
            .zip(turn.options.iter())
            .map(|(label, value)| format!("{label}) {value}"))
            .collect();
        println!("   {}", options.join("    "));
        println!("   {}", self.messages.t("quiz.timeLeft", &[("seconds", &turn.time_left)]));
    }
}

impl SessionReporter for TerminalReporter<'_> {
    fn on_question(&self, session: &QuizSession, turn: &Turn) {
        let q = turn.question;
        println!();
        println!(
            "{}",
            self.messages.t(
                "quiz.question",
                &[
                    ("number", &(session.questions_answered() + 1)),
                    ("question", &format!("{} × {}", q.multiplicand, q.multiplier)),
                ]
            )
        );
        self.print_turn(turn);
    }

    fn on_tick(&self, time_left: u32) {
        if ANNOUNCED_TICKS.contains(&time_left) {
            println!("   {}", self.messages.t("quiz.timeLeft", &[("seconds", &time_left)]));
        }
    }

    fn on_answer(&self, outcome: &AnswerOutcome, progress: &UserProgress) {
        let q = outcome.question;
        let question = format!("{} × {}", q.multiplicand, q.multiplier);
        let key = match (outcome.correct, outcome.answer) {
            (true, _) => "quiz.correct",
            (false, Some(_)) => "quiz.wrong",
            (false, None) => "quiz.timeout",
        };
        println!(
            "{}",
            self.messages
                .t(key, &[("question", &question), ("answer", &q.correct_answer)])
        );
        println!(
            "{}",
            self.messages.t(
                "quiz.dailyProgress",
                &[
                    ("answered", &progress.daily_questions_answered),
                    ("target", &progress.daily_target),
                ]
            )
        );
    }

    fn on_achievements(&self, unlocked: &BTreeSet<AchievementId>) {
        for id in unlocked {
            println!(
                "*** {}",
                self.messages
                    .t("achievements.unlocked", &[("name", &self.messages.achievement_name(*id))])
            );
        }
    }

    fn on_paused(&self) {
        println!("{}", self.messages.t("quiz.paused", &[]));
    }

    fn on_resumed(&self, turn: &Turn) {
        println!("{}", self.messages.t("quiz.resumed", &[]));
        self.print_turn(turn);
    }

    fn on_complete(&self, summary: &SessionSummary) {
        let m = self.messages;
        println!();
        match summary.end {
            EndReason::Completed(CompletionKind::DailyTarget) => {
                println!("{}", m.t("quiz.dailyTaskCompletedTitle", &[]));
                println!(
                    "{}",
                    m.t(
                        "quiz.dailyTaskCompletedMessage",
                        &[("target", &self.daily_target)]
                    )
                );
            }
            EndReason::Completed(CompletionKind::ReviewEmptied) => {
                println!("{}", m.t("quiz.reviewTaskCompletedTitle", &[]));
                println!("{}", m.t("quiz.reviewTaskCompletedMessage", &[]));
            }
            EndReason::NothingToReview => println!("{}", m.t("quiz.nothingToReview", &[])),
            EndReason::DailyTargetMet => println!("{}", m.t("quiz.dailyTargetMet", &[])),
            EndReason::NothingToResume => println!("{}", m.t("quiz.nothingToResume", &[])),
            EndReason::Interrupted => println!("{}", m.t("quiz.interrupted", &[])),
            EndReason::Stopped => {}
        }
        if summary.questions_answered > 0 {
            println!(
                "{}",
                m.t(
                    "quiz.summary",
                    &[
                        ("score", &summary.score),
                        ("answered", &summary.questions_answered),
                    ]
                )
            );
        }
    }
}
