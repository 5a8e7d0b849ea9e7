//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn timestable() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("timestable").unwrap()
}

/// A profile directory with a quiet, fast config.
struct Profile {
    dir: TempDir,
    config: PathBuf,
}

impl Profile {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("timestable.toml");
        std::fs::write(
            &config,
            "advance_delay_ms = 10\n\n[speech]\nenabled = false\n",
        )
        .unwrap();
        Self { dir, config }
    }

    fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// A command bound to this profile, speaking `locale`.
    fn cmd(&self, locale: &str) -> Command {
        let mut cmd = timestable();
        cmd.env("TIMESTABLE_LOCALE", locale)
            .env_remove("TIMESTABLE_DATA_DIR")
            .arg("--config")
            .arg(&self.config)
            .arg("--data-dir")
            .arg(self.data_dir());
        cmd
    }

    fn write_progress(&self, json: &str) {
        std::fs::create_dir_all(self.data_dir()).unwrap();
        std::fs::write(self.data_dir().join("multiplicationProgress"), json).unwrap();
    }
}

#[test]
fn review_on_fresh_profile_has_nothing_to_review() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .arg("review")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("No wrong questions to review"));
}

#[test]
fn review_in_chinese() {
    let profile = Profile::new();
    profile
        .cmd("zh")
        .arg("review")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("错题本是空的"));
}

#[test]
fn stats_json_on_fresh_profile() {
    let profile = Profile::new();
    let output = profile
        .cmd("en")
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["total_questions"], 0);
    assert_eq!(summary["daily_target"], 10);
    assert_eq!(summary["achievements_total"], 9);
}

#[test]
fn stats_reads_stored_progress() {
    let profile = Profile::new();
    profile.write_progress(
        r#"{"totalQuestions":20,"correctAnswers":15,"streak":4,"bestStreak":9,
            "lastPlayDate":"2020-01-01","consecutiveDays":2,
            "wrongQuestions":[{"multiplicand":7,"multiplier":8,"userAnswer":54,"correctAnswer":56,"timestamp":1}],
            "achievements":["first_correct","streak_5","not_a_real_one"]}"#,
    );
    profile
        .cmd("en")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Questions answered"))
        .stdout(predicate::str::contains("75%"))
        .stdout(predicate::str::contains("7× (1)"));

    profile
        .cmd("en")
        .arg("achievements")
        .assert()
        .success()
        .stdout(predicate::str::contains("Achievements (2/9)"))
        .stdout(predicate::str::contains("Warming Up"));
}

#[test]
fn stats_markdown() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .args(["stats", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## timestable progress"));
}

#[test]
fn locale_set_and_get() {
    let profile = Profile::new();
    let plain = || {
        let mut cmd = timestable();
        cmd.env_remove("TIMESTABLE_LOCALE")
            .env_remove("TIMESTABLE_DATA_DIR")
            .arg("--config")
            .arg(&profile.config)
            .arg("--data-dir")
            .arg(profile.data_dir());
        cmd
    };

    plain()
        .arg("locale")
        .assert()
        .success()
        .stdout(predicate::str::contains("中文"));

    plain()
        .args(["locale", "de"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deutsch"));
    let stored = std::fs::read_to_string(profile.data_dir().join("preferred-locale")).unwrap();
    assert_eq!(stored, "de");

    plain()
        .arg("locale")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aktuelle Sprache: Deutsch (de)"));
}

#[test]
fn unknown_locale_fails() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .args(["locale", "klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("unsupported locale"));
}

#[test]
fn reset_requires_confirmation() {
    let profile = Profile::new();
    profile.write_progress(r#"{"totalQuestions":3,"correctAnswers":1}"#);
    let progress_file = profile.data_dir().join("multiplicationProgress");

    profile
        .cmd("en")
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    assert!(progress_file.exists());

    profile
        .cmd("en")
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress has been reset"));
    assert!(!progress_file.exists());
}

#[test]
fn learn_single_cell() {
    let profile = Profile::new();
    profile
        .cmd("zh")
        .args(["learn", "--cell", "7x8", "--no-speech"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 × 8 = 56"))
        .stdout(predicate::str::contains("七八五十六"))
        .stdout(predicate::str::contains("8 × 7"));
}

#[test]
fn learn_rejects_cells_outside_the_table() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .args(["learn", "--cell", "12x3", "--no-speech"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a cell of the table"));
}

#[test]
fn learn_interactive_grid() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .args(["learn", "--no-speech"])
        .write_stdin("3x4\nnope\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("81"))
        .stdout(predicate::str::contains("3 times 4 is 12"))
        .stdout(predicate::str::contains("Not a cell of the table: nope"));
}

#[test]
fn quiz_quit_immediately() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .args(["quiz", "--difficulty", "advanced"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1:"))
        .stdout(predicate::str::contains("Advanced (11-19)"));
    assert!(!profile.data_dir().join("multiplicationQuizState").exists());
}

#[test]
fn quiz_interrupted_then_resumed() {
    let profile = Profile::new();
    profile
        .cmd("en")
        .arg("quiz")
        .write_stdin("p\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused"))
        .stdout(predicate::str::contains("timestable resume"));
    assert!(profile.data_dir().join("multiplicationQuizState").exists());

    profile
        .cmd("en")
        .arg("resume")
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1:"));
    assert!(!profile.data_dir().join("multiplicationQuizState").exists());

    profile
        .cmd("en")
        .arg("resume")
        .assert()
        .success()
        .stdout(predicate::str::contains("no saved quiz"));
}

#[test]
fn quiz_after_daily_target_is_met() {
    let profile = Profile::new();
    let today = chrono::Local::now().date_naive();
    profile.write_progress(&format!(
        r#"{{"totalQuestions":10,"correctAnswers":10,"lastPlayDate":"{today}",
            "dailyQuestionsAnswered":10,"dailyTarget":10,"dailyTaskCompleted":true}}"#
    ));
    profile
        .cmd("en")
        .arg("quiz")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("already done"));
}

#[test]
fn report_writes_html() {
    let profile = Profile::new();
    let output = profile.dir.path().join("report.html");
    profile
        .cmd("en")
        .arg("report")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));
    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("<html"));
}

#[test]
fn missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    timestable()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    timestable()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created timestable.toml"));
    let content = std::fs::read_to_string(dir.path().join("timestable.toml")).unwrap();
    assert!(content.contains("daily_target = 10"));
    assert!(content.contains("[speech]"));

    timestable()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_lists_commands() {
    timestable()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("learn"))
        .stdout(predicate::str::contains("review"))
        .stdout(predicate::str::contains("resume"));
}
