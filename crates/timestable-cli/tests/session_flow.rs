//! End-to-end session flows through the driver, on paused tokio time.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::mpsc;

use timestable_core::achievements::AchievementId;
use timestable_core::clock::FixedClock;
use timestable_core::driver::{
    DriverConfig, EndReason, SessionDriver, SessionReporter, SessionStart, SessionSummary,
    UserInput,
};
use timestable_core::locale::Locale;
use timestable_core::model::{Difficulty, Question, QuizMode, UserProgress, WrongQuestion};
use timestable_core::session::{AnswerOutcome, CompletionKind, QuizSession, QuizSnapshot, Turn};
use timestable_core::storage::{self, QUIZ_STATE_KEY};
use timestable_speech::RecordingNarrator;
use timestable_storage::MemoryStore;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[derive(Default)]
struct Recorder {
    questions: Mutex<Vec<Turn>>,
    ticks: Mutex<Vec<u32>>,
    answers: Mutex<Vec<AnswerOutcome>>,
    unlocked: Mutex<BTreeSet<AchievementId>>,
    paused: Mutex<u32>,
    resumed: Mutex<Vec<Turn>>,
    complete: Mutex<Option<SessionSummary>>,
}

impl SessionReporter for Recorder {
    fn on_question(&self, _: &QuizSession, turn: &Turn) {
        self.questions.lock().unwrap().push(turn.clone());
    }
    fn on_tick(&self, time_left: u32) {
        self.ticks.lock().unwrap().push(time_left);
    }
    fn on_answer(&self, outcome: &AnswerOutcome, _: &UserProgress) {
        self.answers.lock().unwrap().push(outcome.clone());
    }
    fn on_achievements(&self, unlocked: &BTreeSet<AchievementId>) {
        self.unlocked.lock().unwrap().extend(unlocked.iter().copied());
    }
    fn on_paused(&self) {
        *self.paused.lock().unwrap() += 1;
    }
    fn on_resumed(&self, turn: &Turn) {
        self.resumed.lock().unwrap().push(turn.clone());
    }
    fn on_complete(&self, summary: &SessionSummary) {
        *self.complete.lock().unwrap() = Some(summary.clone());
    }
}

impl Recorder {
    /// Wait until the `n`th question (1-based) has been shown.
    async fn question(&self, n: usize) -> Turn {
        loop {
            if let Some(turn) = self.questions.lock().unwrap().get(n - 1).cloned() {
                return turn;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn answer_count(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    narrator: Arc<RecordingNarrator>,
    driver: SessionDriver,
}

impl Harness {
    fn new(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        let narrator = Arc::new(RecordingNarrator::new());
        let config = DriverConfig {
            locale: Locale::En,
            seed: Some(7),
            ..Default::default()
        };
        let driver = SessionDriver::new(
            store.clone(),
            narrator.clone(),
            Arc::new(FixedClock::new(today())),
            config,
        );
        Self {
            store,
            narrator,
            driver,
        }
    }

    fn with_progress(progress: &UserProgress) -> Self {
        let store = MemoryStore::new();
        storage::save_progress(&store, progress).unwrap();
        Self::new(store)
    }

    fn progress(&self) -> UserProgress {
        storage::load_progress(&*self.store, today())
    }
}

fn quiz() -> SessionStart {
    SessionStart::New {
        mode: QuizMode::Quiz,
        difficulty: Difficulty::Beginner,
    }
}

#[tokio::test(start_paused = true)]
async fn timeout_records_a_wrong_answer() {
    let h = Harness::new(MemoryStore::new());
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);

    let script = async {
        let turn = recorder.question(1).await;
        assert!(h.store.contains_key(QUIZ_STATE_KEY));
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(recorder.answer_count(), 1);
        tx.send(UserInput::Stop).await.unwrap();
        turn
    };
    let (summary, turn) = tokio::join!(h.driver.run(quiz(), rx, &recorder), script);
    let summary = summary.unwrap();

    assert_eq!(summary.end, EndReason::Stopped);
    assert_eq!(summary.questions_answered, 1);
    assert_eq!(summary.score, 0);

    let answers = recorder.answers.lock().unwrap();
    assert_eq!(answers[0].answer, None);
    assert!(!answers[0].correct);
    assert_eq!(*recorder.ticks.lock().unwrap(), (1..=9).rev().collect::<Vec<_>>());

    let progress = h.progress();
    assert_eq!(progress.total_questions, 1);
    assert_eq!(progress.streak, 0);
    assert_eq!(progress.wrong_questions.len(), 1);
    assert_eq!(progress.wrong_questions[0].user_answer, 0);
    assert_eq!(progress.wrong_questions[0].key(), turn.question.key());

    let q = turn.question;
    assert_eq!(
        h.narrator.spoken_texts(),
        vec![format!("{} times {} is {}", q.multiplicand, q.multiplier, q.correct_answer)]
    );
    assert!(!h.store.contains_key(QUIZ_STATE_KEY));
}

#[tokio::test(start_paused = true)]
async fn correct_answer_then_stop_clears_quiz_state() {
    let h = Harness::new(MemoryStore::new());
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);

    let script = async {
        let turn = recorder.question(1).await;
        let index = turn
            .options
            .iter()
            .position(|&o| o == turn.question.correct_answer)
            .unwrap();
        tx.send(UserInput::Choose(index)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(UserInput::Stop).await.unwrap();
    };
    let (summary, ()) = tokio::join!(h.driver.run(quiz(), rx, &recorder), script);
    let summary = summary.unwrap();

    assert_eq!(summary.end, EndReason::Stopped);
    assert_eq!(summary.score, 1);
    assert!(recorder.unlocked.lock().unwrap().contains(&AchievementId::FirstCorrect));

    let progress = h.progress();
    assert_eq!(progress.correct_answers, 1);
    assert_eq!(progress.streak, 1);
    assert_eq!(progress.daily_questions_answered, 1);
    assert!(progress.achievements.contains(&AchievementId::FirstCorrect));
    assert!(!h.store.contains_key(QUIZ_STATE_KEY));
}

#[tokio::test(start_paused = true)]
async fn next_question_follows_the_advance_delay() {
    let h = Harness::new(MemoryStore::new());
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);

    let script = async {
        let first = recorder.question(1).await;
        tx.send(UserInput::Answer(first.question.correct_answer + 1))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(recorder.questions.lock().unwrap().len(), 1);
        let second = recorder.question(2).await;
        assert_eq!(second.time_left, 10);
        assert_eq!(second.selected, None);
        tx.send(UserInput::Stop).await.unwrap();
    };
    let (summary, ()) = tokio::join!(h.driver.run(quiz(), rx, &recorder), script);

    assert_eq!(summary.unwrap().questions_answered, 1);
    assert_eq!(h.progress().streak, 0);
}

#[tokio::test(start_paused = true)]
async fn paused_turn_survives_closed_input_and_resumes() {
    let h = Harness::new(MemoryStore::new());

    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);
    let script = async {
        let turn = recorder.question(1).await;
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        tx.send(UserInput::Pause).await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(tx);
        turn
    };
    let (summary, first) = tokio::join!(h.driver.run(quiz(), rx, &recorder), script);
    assert_eq!(summary.unwrap().end, EndReason::Interrupted);
    assert_eq!(recorder.answer_count(), 0);
    assert_eq!(*recorder.paused.lock().unwrap(), 1);

    let snapshot = storage::load_quiz_state(&*h.store).unwrap();
    assert!(snapshot.is_paused);
    assert_eq!(snapshot.current_question, Some(first.question));
    assert_eq!(snapshot.time_left, 8);

    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);
    let script = async {
        let turn = recorder.question(1).await;
        assert_eq!(turn.question, first.question);
        assert_eq!(turn.options, first.options);
        tx.send(UserInput::Resume).await.unwrap();
        tx.send(UserInput::Answer(turn.question.correct_answer))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(UserInput::Stop).await.unwrap();
    };
    let (summary, ()) = tokio::join!(
        h.driver.run(SessionStart::Resume(snapshot), rx, &recorder),
        script
    );
    let summary = summary.unwrap();
    assert_eq!(summary.questions_answered, 1);
    assert_eq!(summary.score, 1);
    assert_eq!(recorder.resumed.lock().unwrap().len(), 1);
    assert!(!h.store.contains_key(QUIZ_STATE_KEY));
}

#[tokio::test(start_paused = true)]
async fn answers_are_ignored_while_paused() {
    let h = Harness::new(MemoryStore::new());
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);

    let script = async {
        let turn = recorder.question(1).await;
        tx.send(UserInput::Pause).await.unwrap();
        tx.send(UserInput::Answer(turn.question.correct_answer))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(recorder.answer_count(), 0);
        assert!(recorder.ticks.lock().unwrap().is_empty());
        tx.send(UserInput::Stop).await.unwrap();
    };
    let (summary, ()) = tokio::join!(h.driver.run(quiz(), rx, &recorder), script);

    assert_eq!(summary.unwrap().questions_answered, 0);
    assert_eq!(h.progress().total_questions, 0);
}

#[tokio::test(start_paused = true)]
async fn review_completes_when_the_list_empties() {
    let progress = UserProgress {
        wrong_questions: vec![WrongQuestion::from_question(&Question::new(3, 4), Some(7), 1)],
        ..Default::default()
    };
    let h = Harness::with_progress(&progress);
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);

    let script = async {
        let turn = recorder.question(1).await;
        assert_eq!(turn.question, Question::new(3, 4));
        tx.send(UserInput::Answer(12)).await.unwrap();
        tx
    };
    let (summary, _tx) = tokio::join!(
        h.driver.run(
            SessionStart::New {
                mode: QuizMode::Review,
                difficulty: Difficulty::Beginner,
            },
            rx,
            &recorder
        ),
        script
    );
    let summary = summary.unwrap();

    assert_eq!(summary.end, EndReason::Completed(CompletionKind::ReviewEmptied));
    assert_eq!(summary.score, 1);
    let progress = h.progress();
    assert!(progress.wrong_questions.is_empty());
    assert_eq!(progress.daily_questions_answered, 0);
    assert!(recorder.complete.lock().unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn quiz_completes_at_the_daily_target() {
    let progress = UserProgress {
        total_questions: 9,
        correct_answers: 9,
        last_play_date: Some(today()),
        daily_questions_answered: 9,
        ..Default::default()
    };
    let h = Harness::with_progress(&progress);
    let recorder = Recorder::default();
    let (tx, rx) = mpsc::channel(8);

    let script = async {
        let turn = recorder.question(1).await;
        tx.send(UserInput::Answer(turn.question.correct_answer))
            .await
            .unwrap();
        tx
    };
    let (summary, _tx) = tokio::join!(h.driver.run(quiz(), rx, &recorder), script);

    assert_eq!(
        summary.unwrap().end,
        EndReason::Completed(CompletionKind::DailyTarget)
    );
    let progress = h.progress();
    assert!(progress.daily_task_completed);
    assert!(progress.achievements.contains(&AchievementId::DailyTaskComplete));
    assert!(recorder
        .unlocked
        .lock()
        .unwrap()
        .contains(&AchievementId::DailyTaskComplete));
    assert!(!h.store.contains_key(QUIZ_STATE_KEY));
}

#[tokio::test(start_paused = true)]
async fn sessions_that_cannot_start() {
    let h = Harness::new(MemoryStore::new());
    let (_tx, rx) = mpsc::channel(1);
    let summary = h
        .driver
        .run(
            SessionStart::New {
                mode: QuizMode::Review,
                difficulty: Difficulty::Expert,
            },
            rx,
            &Recorder::default(),
        )
        .await
        .unwrap();
    assert_eq!(summary.end, EndReason::NothingToReview);

    let empty_snapshot: QuizSnapshot = serde_json::from_str("{}").unwrap();

    let (_tx, rx) = mpsc::channel(1);
    let summary = h
        .driver
        .run(SessionStart::Resume(empty_snapshot), rx, &Recorder::default())
        .await
        .unwrap();
    assert_eq!(summary.end, EndReason::NothingToResume);

    let done = UserProgress {
        last_play_date: Some(today()),
        daily_questions_answered: 10,
        daily_task_completed: true,
        ..Default::default()
    };
    let h = Harness::with_progress(&done);
    let (_tx, rx) = mpsc::channel(1);
    let summary = h.driver.run(quiz(), rx, &Recorder::default()).await.unwrap();
    assert_eq!(summary.end, EndReason::DailyTargetMet);
    assert!(h.narrator.spoken_texts().is_empty());
}
