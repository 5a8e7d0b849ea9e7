//! Typed access to the persisted blobs.
//!
//! Reads never fail: missing or unreadable values fall back to defaults and
//! are logged. Writes propagate [`StoreError`].

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::locale::Locale;
use crate::model::UserProgress;
use crate::session::QuizSnapshot;
use crate::traits::KeyValueStore;

pub const PROGRESS_KEY: &str = "multiplicationProgress";
pub const QUIZ_STATE_KEY: &str = "multiplicationQuizState";
pub const LOCALE_KEY: &str = "preferred-locale";

fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read store");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring corrupted value");
            None
        }
    }
}

fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Load the progress blob, applying the daily rollover for `today`.
pub fn load_progress(store: &dyn KeyValueStore, today: NaiveDate) -> UserProgress {
    let mut progress: UserProgress = read_json(store, PROGRESS_KEY).unwrap_or_default();
    if progress.normalize() {
        tracing::warn!("repaired inconsistent progress blob");
    }
    if progress.roll_over(today) {
        tracing::debug!(%today, "new day, daily counters reset");
    }
    progress
}

pub fn save_progress(store: &dyn KeyValueStore, progress: &UserProgress) -> Result<(), StoreError> {
    write_json(store, PROGRESS_KEY, progress)
}

pub fn load_quiz_state(store: &dyn KeyValueStore) -> Option<QuizSnapshot> {
    read_json(store, QUIZ_STATE_KEY)
}

pub fn save_quiz_state(store: &dyn KeyValueStore, snapshot: &QuizSnapshot) -> Result<(), StoreError> {
    write_json(store, QUIZ_STATE_KEY, snapshot)
}

pub fn clear_quiz_state(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(QUIZ_STATE_KEY)
}

/// The stored locale tag is a bare string, not JSON.
pub fn load_locale(store: &dyn KeyValueStore) -> Locale {
    match store.get(LOCALE_KEY) {
        Ok(Some(tag)) => tag.parse().unwrap_or_else(|_| {
            tracing::warn!(tag, "unknown stored locale, using default");
            Locale::default()
        }),
        Ok(None) => Locale::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read locale");
            Locale::default()
        }
    }
}

pub fn save_locale(store: &dyn KeyValueStore, locale: Locale) -> Result<(), StoreError> {
    store.set(LOCALE_KEY, locale.tag())
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use super::*;
    use crate::model::{Difficulty, Mode, Question, QuizMode, MAX_WRONG_QUESTIONS};
    use crate::progress::{update_progress, AnswerEvent};
    use crate::session::QuizSession;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, String>>);

    impl KeyValueStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.0.lock().unwrap().get(key).cloned())
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().insert(key.into(), value.into());
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn missing_progress_is_default() {
        let store = MapStore::default();
        assert_eq!(load_progress(&store, today()), UserProgress::default());
    }

    #[test]
    fn corrupted_progress_falls_back_to_default() {
        let store = MapStore::default();
        store.set(PROGRESS_KEY, "{not json").unwrap();
        assert_eq!(load_progress(&store, today()), UserProgress::default());
    }

    #[test]
    fn progress_round_trips_and_rolls_over() {
        let store = MapStore::default();
        let progress = UserProgress {
            total_questions: 12,
            daily_questions_answered: 7,
            last_play_date: today().pred_opt(),
            ..Default::default()
        };
        save_progress(&store, &progress).unwrap();
        let raw = store.get(PROGRESS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"totalQuestions\":12"));

        let loaded = load_progress(&store, today());
        assert_eq!(loaded.total_questions, 12);
        assert_eq!(loaded.daily_questions_answered, 0);

        let same_day = load_progress(&store, today().pred_opt().unwrap());
        assert_eq!(same_day.daily_questions_answered, 7);
    }

    #[test]
    fn oversized_wrong_list_is_repaired_on_load() {
        let entries: Vec<String> = (0..180u32)
            .map(|i| {
                let k = i % 120;
                let (a, b) = (k / 9 + 1, k % 9 + 1);
                format!(
                    r#"{{"multiplicand":{a},"multiplier":{b},"userAnswer":1,"correctAnswer":{},"timestamp":{i}}}"#,
                    a * b
                )
            })
            .collect();
        let blob = format!(
            r#"{{"totalQuestions":200,"correctAnswers":20,"lastPlayDate":"2026-10-18","wrongQuestions":[{}]}}"#,
            entries.join(",")
        );
        let store = MapStore::default();
        store.set(PROGRESS_KEY, &blob).unwrap();

        let loaded = load_progress(&store, today());
        assert_eq!(loaded.wrong_questions.len(), MAX_WRONG_QUESTIONS);

        let q = Question::new(9, 9);
        let event = AnswerEvent::from_answer(&q, Some(81), Mode::Quiz, 0);
        let next = update_progress(&loaded, &event, today()).progress;
        let keys: HashSet<_> = next.wrong_questions.iter().map(|w| w.key()).collect();
        assert!(next.wrong_questions.len() <= MAX_WRONG_QUESTIONS);
        assert_eq!(keys.len(), next.wrong_questions.len());
    }

    #[test]
    fn quiz_state_save_and_clear() {
        let store = MapStore::default();
        assert!(load_quiz_state(&store).is_none());
        let snapshot = QuizSession::new(QuizMode::Review, Difficulty::Expert).snapshot();
        save_quiz_state(&store, &snapshot).unwrap();
        assert_eq!(load_quiz_state(&store), Some(snapshot));
        clear_quiz_state(&store).unwrap();
        assert!(load_quiz_state(&store).is_none());
    }

    #[test]
    fn locale_is_stored_as_plain_tag() {
        let store = MapStore::default();
        assert_eq!(load_locale(&store), Locale::Zh);
        save_locale(&store, Locale::De).unwrap();
        assert_eq!(store.get(LOCALE_KEY).unwrap().as_deref(), Some("de"));
        assert_eq!(load_locale(&store), Locale::De);
        store.set(LOCALE_KEY, "klingon").unwrap();
        assert_eq!(load_locale(&store), Locale::Zh);
    }
}
