use crate::clock::{Clock, timestamp};
use crate::error::AppError;
use crate::model::{CategoryId, CompletedTask, ProgressState};
use crate::state::WidgetState;
use serde::Serialize;

/// Tasks per category per day that fill a progress bar.
pub const DEFAULT_DAILY_TARGET: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub state: WidgetState,
    pub task: CompletedTask,
    pub leveled_up: bool,
}

/// Records `task_name` as done today in `category`.
///
/// Returns `Ok(None)` without touching anything when the name is blank.
pub fn apply_completion(
    state: &WidgetState,
    category: CategoryId,
    task_name: &str,
    clock: &dyn Clock,
) -> Result<Option<Completion>, AppError> {
    let name = task_name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    let task = CompletedTask {
        name: name.to_string(),
        category,
        timestamp: timestamp(clock.now())?,
    };

    let mut next = state.clone();
    next.log
        .entry(next.today_key.clone())
        .or_default()
        .push(task.clone());
    next.history
        .entry(category)
        .or_default()
        .push(task.name.clone());

    let (progress, leveled_up) = state.progress.record_completion();
    next.progress = progress;

    if leveled_up {
        tracing::debug!(level = progress.level, "level up");
    }
    tracing::debug!(
        task = %task.name,
        %category,
        streak = progress.streak,
        experience = progress.experience,
        "task completed"
    );

    Ok(Some(Completion {
        state: next,
        task,
        leveled_up,
    }))
}

pub fn category_count(tasks: &[CompletedTask], category: CategoryId) -> usize {
    tasks.iter().filter(|task| task.category == category).count()
}

/// `count / daily_target`. Not clamped: a busy day reports more than 1.0.
pub fn category_progress_ratio(
    tasks: &[CompletedTask],
    category: CategoryId,
    daily_target: u32,
) -> f64 {
    if daily_target == 0 {
        return 0.0;
    }
    category_count(tasks, category) as f64 / daily_target as f64
}

pub fn experience_ratio(progress: &ProgressState) -> f64 {
    progress.experience as f64 / progress.next_level_threshold() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProgress {
    pub category: CategoryId,
    pub count: usize,
    pub ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub username: Option<String>,
    pub level: u32,
    pub streak: u32,
    pub experience: u32,
    pub next_level_threshold: u32,
    pub experience_ratio: f64,
    pub daily_target: u32,
    pub categories: Vec<CategoryProgress>,
    pub completed_today: Vec<CompletedTask>,
}

pub fn dashboard(state: &WidgetState, daily_target: u32) -> Dashboard {
    let tasks = state.today_tasks();
    let categories = CategoryId::ALL
        .into_iter()
        .map(|category| CategoryProgress {
            category,
            count: category_count(tasks, category),
            ratio: category_progress_ratio(tasks, category, daily_target),
        })
        .collect();

    Dashboard {
        username: state.username.clone(),
        level: state.progress.level,
        streak: state.progress.streak,
        experience: state.progress.experience,
        next_level_threshold: state.progress.next_level_threshold(),
        experience_ratio: experience_ratio(&state.progress),
        daily_target,
        categories,
        completed_today: tasks.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_DAILY_TARGET, apply_completion, category_count, category_progress_ratio,
        dashboard, experience_ratio,
    };
    use crate::clock::FixedClock;
    use crate::model::{CategoryId, CompletedTask, ProgressState};
    use crate::state::WidgetState;
    use time::macros::datetime;

    fn clock() -> FixedClock {
        FixedClock(datetime!(2026-10-19 09:30:00 UTC))
    }

    fn completed(name: &str, category: CategoryId) -> CompletedTask {
        CompletedTask {
            name: name.to_string(),
            category,
            timestamp: "2026-10-19T09:00:00Z".to_string(),
        }
    }

    #[test]
    fn completion_appends_to_log_and_history() {
        let state = WidgetState::new("2026-10-19");
        let completion = apply_completion(&state, CategoryId::Work, " Clear inbox ", &clock())
            .unwrap()
            .unwrap();

        assert_eq!(completion.task.name, "Clear inbox");
        assert_eq!(completion.task.category, CategoryId::Work);
        assert_eq!(completion.task.timestamp, "2026-10-19T09:30:00Z");
        assert_eq!(completion.state.today_tasks(), &[completion.task.clone()]);
        assert_eq!(
            completion.state.history.get(&CategoryId::Work),
            Some(&vec!["Clear inbox".to_string()])
        );
        assert_eq!(completion.state.progress.streak, 1);
        assert_eq!(completion.state.progress.experience, 20);
        assert!(!completion.leveled_up);

        assert!(state.today_tasks().is_empty());
        assert_eq!(state.progress, ProgressState::default());
    }

    #[test]
    fn blank_name_is_a_no_op() {
        let state = WidgetState::new("2026-10-19");
        let result = apply_completion(&state, CategoryId::Fitness, "   ", &clock()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn five_completions_reach_level_two() {
        let mut state = WidgetState::new("2026-10-19");
        for index in 0..4 {
            state = apply_completion(&state, CategoryId::Personal, "Reading time", &clock())
                .unwrap()
                .unwrap()
                .state;
            assert_eq!(state.progress.experience, 20 * (index + 1));
        }
        assert_eq!(state.progress.level, 1);
        assert_eq!(state.progress.experience, 80);

        let completion = apply_completion(&state, CategoryId::Personal, "Reading time", &clock())
            .unwrap()
            .unwrap();
        assert!(completion.leveled_up);
        assert_eq!(completion.state.progress.level, 2);
        assert_eq!(completion.state.progress.experience, 0);
        assert_eq!(completion.state.progress.streak, 5);
        assert_eq!(completion.state.history[&CategoryId::Personal].len(), 5);
    }

    #[test]
    fn category_count_matches_only_that_category() {
        let tasks = vec![
            completed("a", CategoryId::Work),
            completed("b", CategoryId::Work),
            completed("c", CategoryId::Fitness),
            completed("d", CategoryId::Work),
            completed("e", CategoryId::Fitness),
        ];

        assert_eq!(category_count(&tasks, CategoryId::Work), 3);
        assert_eq!(category_count(&tasks, CategoryId::Personal), 0);
        assert_eq!(category_count(&tasks, CategoryId::Fitness), 2);
    }

    #[test]
    fn progress_ratio_is_not_clamped() {
        let tasks: Vec<_> = (0..10)
            .map(|index| completed(&format!("task {index}"), CategoryId::Work))
            .collect();

        assert_eq!(category_progress_ratio(&tasks, CategoryId::Work, 8), 1.25);
        assert_eq!(category_progress_ratio(&tasks[..2], CategoryId::Work, 8), 0.25);
        assert_eq!(category_progress_ratio(&tasks, CategoryId::Work, 0), 0.0);
    }

    #[test]
    fn experience_ratio_uses_current_level_threshold() {
        let progress = ProgressState {
            streak: 7,
            level: 2,
            experience: 50,
        };
        assert_eq!(experience_ratio(&progress), 0.25);
    }

    #[test]
    fn dashboard_reports_every_category() {
        let mut state = WidgetState::new("2026-10-19");
        state.username = Some("Ada".to_string());
        state.log.insert(
            "2026-10-19".to_string(),
            vec![
                completed("Walk break", CategoryId::Fitness),
                completed("Clear inbox", CategoryId::Work),
            ],
        );
        state.log.insert(
            "2026-10-18".to_string(),
            vec![completed("Reading time", CategoryId::Personal)],
        );

        let summary = dashboard(&state, DEFAULT_DAILY_TARGET);
        assert_eq!(summary.username.as_deref(), Some("Ada"));
        assert_eq!(summary.level, 1);
        assert_eq!(summary.next_level_threshold, 100);
        assert_eq!(summary.categories.len(), 3);
        assert_eq!(summary.categories[0].category, CategoryId::Work);
        assert_eq!(summary.categories[0].count, 1);
        assert_eq!(summary.categories[1].count, 0);
        assert_eq!(summary.categories[2].ratio, 0.125);
        assert_eq!(summary.completed_today.len(), 2);
    }
}
