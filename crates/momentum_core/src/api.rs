use crate::breakdown::{Breakdown, breakdown};
use crate::catalog::TimeSlot;
use crate::clock::{Clock, clock_from_env};
use crate::error::AppError;
use crate::model::{CategoryId, CompletedTask};
use crate::notify::{Notifier, completion_headline, notifier_from_env};
use crate::progress::{Completion, Dashboard, apply_completion, dashboard};
use crate::state::{WidgetState, load_state, save_state};
use crate::storage::json_store::{self, JsonFileStore};
use crate::suggest::suggest;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub category: CategoryId,
    pub slot: TimeSlot,
    pub tasks: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub task: CompletedTask,
    pub streak: u32,
    pub level: u32,
    pub experience: u32,
    pub next_level_threshold: u32,
    pub leveled_up: bool,
}

#[derive(Debug)]
pub struct CountdownOutcome {
    pub completion: CompletionOutcome,
    pub notification_error: Option<AppError>,
}

pub fn load() -> Result<WidgetState, AppError> {
    let path = json_store::store_path()?;
    let clock = clock_from_env()?;
    load_with_path(&path, clock.as_ref())
}

pub fn set_username(name: &str) -> Result<String, AppError> {
    let path = json_store::store_path()?;
    let clock = clock_from_env()?;
    set_username_with_path(&path, clock.as_ref(), name)
}

pub fn suggest_tasks(category: CategoryId) -> Result<Suggestions, AppError> {
    let path = json_store::store_path()?;
    let clock = clock_from_env()?;
    suggest_tasks_with_path(&path, clock.as_ref(), category)
}

pub fn breakdown_task(text: &str) -> Result<Option<Breakdown>, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("task is required"));
    }
    Ok(breakdown(trimmed))
}

pub fn complete_task(category: CategoryId, name: &str) -> Result<CompletionOutcome, AppError> {
    let path = json_store::store_path()?;
    let clock = clock_from_env()?;
    complete_task_with_path(&path, clock.as_ref(), category, name)
}

/// Completes the task a finished countdown was running for and sends a
/// desktop notification. A failed notification does not undo the completion.
pub fn finish_countdown(category: CategoryId, name: &str) -> Result<CountdownOutcome, AppError> {
    let path = json_store::store_path()?;
    let clock = clock_from_env()?;
    let notifier = notifier_from_env()?;
    finish_countdown_with_path(&path, clock.as_ref(), notifier.as_ref(), category, name)
}

pub fn progress_dashboard(daily_target: u32) -> Result<Dashboard, AppError> {
    let path = json_store::store_path()?;
    let clock = clock_from_env()?;
    progress_dashboard_with_path(&path, clock.as_ref(), daily_target)
}

fn open_and_load(path: &Path, clock: &dyn Clock) -> Result<(JsonFileStore, WidgetState), AppError> {
    let mut store = JsonFileStore::open(path)?;
    let state = load_state(&mut store, clock.today())?;
    Ok((store, state))
}

fn load_with_path(path: &Path, clock: &dyn Clock) -> Result<WidgetState, AppError> {
    let (store, state) = open_and_load(path, clock)?;
    store.flush()?;
    Ok(state)
}

fn set_username_with_path(path: &Path, clock: &dyn Clock, name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }

    let (mut store, mut state) = open_and_load(path, clock)?;
    state.username = Some(trimmed.to_string());
    save_state(&mut store, &state)?;
    store.flush()?;

    Ok(trimmed.to_string())
}

fn suggest_tasks_with_path(
    path: &Path,
    clock: &dyn Clock,
    category: CategoryId,
) -> Result<Suggestions, AppError> {
    let state = load_with_path(path, clock)?;
    Ok(Suggestions {
        category,
        slot: TimeSlot::from_hour(clock.hour()),
        tasks: suggest(clock, category, state.today_tasks()),
    })
}

fn complete_task_with_path(
    path: &Path,
    clock: &dyn Clock,
    category: CategoryId,
    name: &str,
) -> Result<CompletionOutcome, AppError> {
    let (mut store, state) = open_and_load(path, clock)?;
    let Completion {
        state,
        task,
        leveled_up,
    } = apply_completion(&state, category, name, clock)?
        .ok_or_else(|| AppError::invalid_input("task is required"))?;

    save_state(&mut store, &state)?;
    store.flush()?;

    Ok(CompletionOutcome {
        task,
        streak: state.progress.streak,
        level: state.progress.level,
        experience: state.progress.experience,
        next_level_threshold: state.progress.next_level_threshold(),
        leveled_up,
    })
}

fn finish_countdown_with_path(
    path: &Path,
    clock: &dyn Clock,
    notifier: &dyn Notifier,
    category: CategoryId,
    name: &str,
) -> Result<CountdownOutcome, AppError> {
    let completion = complete_task_with_path(path, clock, category, name)?;
    let headline = completion_headline(completion.leveled_up, completion.level);
    let notification_error = notifier.notify(&completion.task, &headline).err();
    if let Some(err) = notification_error.as_ref() {
        tracing::warn!(error = %err, "completion notification failed");
    }

    Ok(CountdownOutcome {
        completion,
        notification_error,
    })
}

fn progress_dashboard_with_path(
    path: &Path,
    clock: &dyn Clock,
    daily_target: u32,
) -> Result<Dashboard, AppError> {
    let state = load_with_path(path, clock)?;
    Ok(dashboard(&state, daily_target))
}
