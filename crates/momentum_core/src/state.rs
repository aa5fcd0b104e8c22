//! Loading and saving [`WidgetState`] through a [`KeyValueStore`].
//!
//! Each field lives under its own key so a malformed value only costs that
//! field: it is logged and replaced by its default. Log entries older than
//! [`RETENTION_DAYS`] are dropped on every load.

use crate::clock::{date_key, parse_date_key};
use crate::error::AppError;
use crate::model::{
    CategoryId, CompletedTask, DailyTaskLog, MAX_LEVEL, ProgressState, TaskHistory,
};
use crate::storage::KeyValueStore;
use serde_json::Value;
use std::collections::BTreeMap;
use time::Date;

pub const RETENTION_DAYS: i64 = 7;

pub const USERNAME_KEY: &str = "username";
pub const COMPLETED_TASKS_KEY: &str = "completedTasks";
pub const STREAK_KEY: &str = "streak";
pub const LEVEL_KEY: &str = "level";
pub const EXPERIENCE_KEY: &str = "experience";
pub const TASK_HISTORY_KEY: &str = "taskHistory";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    pub username: Option<String>,
    pub today_key: String,
    pub log: DailyTaskLog,
    pub history: TaskHistory,
    pub progress: ProgressState,
}

impl WidgetState {
    pub fn new<K: Into<String>>(today_key: K) -> Self {
        Self {
            username: None,
            today_key: today_key.into(),
            log: DailyTaskLog::new(),
            history: TaskHistory::new(),
            progress: ProgressState::default(),
        }
    }

    pub fn today_tasks(&self) -> &[CompletedTask] {
        self.log
            .get(&self.today_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Drops entries dated [`RETENTION_DAYS`] or more before `today` and entries
/// whose key is not a date.
pub fn prune_log(log: DailyTaskLog, today: Date) -> DailyTaskLog {
    log.into_iter()
        .filter(|(key, _)| match parse_date_key(key) {
            Some(date) => (today - date).whole_days() < RETENTION_DAYS,
            None => {
                tracing::warn!(key = %key, "dropping log entry with malformed date");
                false
            }
        })
        .collect()
}

/// Decodes the log one task at a time so a bad entry only costs itself.
fn read_log<S: KeyValueStore>(store: &S) -> DailyTaskLog {
    let days: BTreeMap<String, Vec<Value>> = store.get(COMPLETED_TASKS_KEY, BTreeMap::new());
    days.into_iter()
        .map(|(day, entries)| {
            let tasks = entries
                .into_iter()
                .filter_map(|entry| match serde_json::from_value::<CompletedTask>(entry) {
                    Ok(task) => Some(task),
                    Err(err) => {
                        tracing::warn!(day = %day, error = %err, "dropping malformed completed task");
                        None
                    }
                })
                .collect();
            (day, tasks)
        })
        .collect()
}

fn read_history<S: KeyValueStore>(store: &S) -> TaskHistory {
    let categories: BTreeMap<String, Value> = store.get(TASK_HISTORY_KEY, BTreeMap::new());
    categories
        .into_iter()
        .filter_map(|(key, names)| {
            let category = match key.parse::<CategoryId>() {
                Ok(category) => category,
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "dropping task history entry");
                    return None;
                }
            };
            match serde_json::from_value::<Vec<String>>(names) {
                Ok(names) => Some((category, names)),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "dropping task history entry");
                    None
                }
            }
        })
        .collect()
}

/// Reads every key, prunes the log, makes sure today has an entry and writes
/// the pruned log back.
pub fn load_state<S: KeyValueStore>(store: &mut S, today: Date) -> Result<WidgetState, AppError> {
    let today_key = date_key(today)?;

    let username: String = store.get(USERNAME_KEY, String::new());
    let username = Some(username.trim().to_string()).filter(|name| !name.is_empty());

    let stored_log = read_log(store);
    let before = stored_log.len();
    let mut log = prune_log(stored_log, today);
    if log.len() < before {
        tracing::debug!(pruned = before - log.len(), "pruned old log entries");
    }
    log.entry(today_key.clone()).or_default();
    store.set(COMPLETED_TASKS_KEY, &log)?;

    let mut level: u32 = store.get(LEVEL_KEY, 1);
    if level > MAX_LEVEL {
        tracing::warn!(level, "stored level out of range, using default");
        level = 1;
    }
    let progress = ProgressState {
        streak: store.get(STREAK_KEY, 0),
        level,
        experience: store.get(EXPERIENCE_KEY, 0),
    }
    .normalized();

    Ok(WidgetState {
        username,
        today_key,
        log,
        history: read_history(store),
        progress,
    })
}

pub fn save_state<S: KeyValueStore>(store: &mut S, state: &WidgetState) -> Result<(), AppError> {
    if let Some(username) = state.username.as_ref() {
        store.set(USERNAME_KEY, username)?;
    }
    store.set(COMPLETED_TASKS_KEY, &state.log)?;
    store.set(STREAK_KEY, &state.progress.streak)?;
    store.set(LEVEL_KEY, &state.progress.level)?;
    store.set(EXPERIENCE_KEY, &state.progress.experience)?;
    store.set(TASK_HISTORY_KEY, &state.history)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        COMPLETED_TASKS_KEY, EXPERIENCE_KEY, LEVEL_KEY, STREAK_KEY, TASK_HISTORY_KEY,
        USERNAME_KEY, WidgetState, load_state, prune_log, save_state,
    };
    use crate::model::{CategoryId, CompletedTask, DailyTaskLog, ProgressState};
    use crate::storage::{KeyValueStore, MemoryStore};
    use serde_json::json;
    use time::macros::date;

    fn completed(name: &str) -> CompletedTask {
        CompletedTask {
            name: name.to_string(),
            category: CategoryId::Work,
            timestamp: "2026-10-10T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn prune_keeps_six_days_and_drops_seven() {
        let mut log = DailyTaskLog::new();
        log.insert("2026-10-19".to_string(), vec![completed("today")]);
        log.insert("2026-10-13".to_string(), vec![completed("six days")]);
        log.insert("2026-10-12".to_string(), vec![completed("seven days")]);
        log.insert("2026-09-01".to_string(), vec![completed("ancient")]);

        let pruned = prune_log(log, date!(2026 - 10 - 19));
        let keys: Vec<_> = pruned.keys().cloned().collect();
        assert_eq!(keys, vec!["2026-10-13".to_string(), "2026-10-19".to_string()]);
    }

    #[test]
    fn prune_drops_malformed_keys() {
        let mut log = DailyTaskLog::new();
        log.insert("Mon Oct 19 2026".to_string(), vec![completed("legacy")]);

        assert!(prune_log(log, date!(2026 - 10 - 19)).is_empty());
    }

    #[test]
    fn load_from_empty_store_uses_defaults() {
        let mut store = MemoryStore::default();
        let state = load_state(&mut store, date!(2026 - 10 - 19)).unwrap();

        assert_eq!(state.username, None);
        assert_eq!(state.today_key, "2026-10-19");
        assert!(state.today_tasks().is_empty());
        assert!(state.log.contains_key("2026-10-19"));
        assert!(state.history.is_empty());
        assert_eq!(state.progress, ProgressState::default());

        let written: DailyTaskLog = store.get(COMPLETED_TASKS_KEY, DailyTaskLog::new());
        assert!(written.contains_key("2026-10-19"));
    }

    #[test]
    fn load_writes_pruned_log_back() {
        let mut store = MemoryStore::default();
        store.set_value(
            COMPLETED_TASKS_KEY,
            json!({
                "2026-10-01": [
                    { "name": "old", "category": "work", "timestamp": "2026-10-01T08:00:00Z" }
                ],
                "2026-10-18": [
                    { "name": "recent", "category": "fitness", "timestamp": "2026-10-18T08:00:00Z" }
                ]
            }),
        );

        let state = load_state(&mut store, date!(2026 - 10 - 19)).unwrap();
        assert_eq!(state.log.len(), 2);
        assert_eq!(state.log["2026-10-18"][0].name, "recent");

        let written = store.get_value(COMPLETED_TASKS_KEY).unwrap();
        assert!(written.get("2026-10-01").is_none());
        assert!(written.get("2026-10-18").is_some());
        assert!(written.get("2026-10-19").is_some());
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let mut store = MemoryStore::default();
        store.set_value(USERNAME_KEY, json!(42));
        store.set_value(STREAK_KEY, json!(-3));
        store.set_value(LEVEL_KEY, json!("two"));
        store.set_value(EXPERIENCE_KEY, json!(40));
        store.set_value(TASK_HISTORY_KEY, json!({ "study": ["flashcards"] }));
        store.set_value(COMPLETED_TASKS_KEY, json!([1, 2, 3]));

        let state = load_state(&mut store, date!(2026 - 10 - 19)).unwrap();

        assert_eq!(state.username, None);
        assert_eq!(state.progress.streak, 0);
        assert_eq!(state.progress.level, 1);
        assert_eq!(state.progress.experience, 40);
        assert!(state.history.is_empty());
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn bad_entries_only_cost_themselves() {
        let mut store = MemoryStore::default();
        store.set_value(
            COMPLETED_TASKS_KEY,
            json!({
                "2026-10-19": [
                    { "name": "Clear inbox", "category": "work", "timestamp": "2026-10-19T09:00:00Z" },
                    { "name": "Flashcards", "category": "study", "timestamp": "2026-10-19T10:00:00Z" }
                ]
            }),
        );
        store.set_value(
            TASK_HISTORY_KEY,
            json!({ "study": ["Flashcards"], "work": ["Clear inbox"] }),
        );

        let state = load_state(&mut store, date!(2026 - 10 - 19)).unwrap();

        assert_eq!(state.today_tasks().len(), 1);
        assert_eq!(state.today_tasks()[0].name, "Clear inbox");
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[&CategoryId::Work], vec!["Clear inbox".to_string()]);
    }

    #[test]
    fn out_of_range_level_falls_back_to_default() {
        let mut store = MemoryStore::default();
        store.set_value(LEVEL_KEY, json!(50_000_000u32));
        store.set_value(EXPERIENCE_KEY, json!(60));
        store.set_value(STREAK_KEY, json!(9));

        let state = load_state(&mut store, date!(2026 - 10 - 19)).unwrap();

        assert_eq!(state.progress.level, 1);
        assert_eq!(state.progress.experience, 60);
        assert_eq!(state.progress.streak, 9);
    }

    #[test]
    fn save_then_load_preserves_state() {
        let mut store = MemoryStore::default();
        let mut state = WidgetState::new("2026-10-19");
        state.username = Some("Grace".to_string());
        state.log.insert("2026-10-19".to_string(), vec![completed("ship it")]);
        state
            .history
            .insert(CategoryId::Work, vec!["ship it".to_string()]);
        state.progress = ProgressState {
            streak: 12,
            level: 3,
            experience: 60,
        };

        save_state(&mut store, &state).unwrap();
        let loaded = load_state(&mut store, date!(2026 - 10 - 19)).unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn save_without_username_leaves_key_absent() {
        let mut store = MemoryStore::default();
        save_state(&mut store, &WidgetState::new("2026-10-19")).unwrap();

        assert!(store.get_value(USERNAME_KEY).is_none());
        assert_eq!(store.get_value(LEVEL_KEY), Some(json!(1)));
    }
}
