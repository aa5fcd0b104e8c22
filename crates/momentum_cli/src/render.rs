use momentum_core::api::{CompletionOutcome, Suggestions};
use momentum_core::breakdown::Breakdown;
use momentum_core::config::Palette;
use momentum_core::progress::Dashboard;
use tabled::settings::Style;
use tabled::{Table, Tabled};

const BAR_WIDTH: usize = 16;

/// Fixed-width bar; ratios above 1.0 draw a full bar.
pub fn progress_bar(ratio: f64) -> String {
    let clamped = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (clamped * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn suggestions_text(suggestions: &Suggestions) -> String {
    let mut lines = vec![format!(
        "Suggestions for {} ({}):",
        suggestions.category, suggestions.slot
    )];
    if suggestions.tasks.is_empty() {
        lines.push("  (nothing new right now)".to_string());
    }
    for (index, task) in suggestions.tasks.iter().enumerate() {
        lines.push(format!("  {}. {}", index + 1, task));
    }
    lines.join("\n")
}

pub fn breakdown_text(task: &str, breakdown: Option<&Breakdown>) -> String {
    match breakdown {
        Some(breakdown) => {
            let mut lines = vec![format!("Breakdown for '{task}':")];
            for (index, subtask) in breakdown.subtasks.iter().enumerate() {
                lines.push(format!("  {}. {}", index + 1, subtask));
            }
            lines.join("\n")
        }
        None => format!("No breakdown for '{task}'"),
    }
}

pub fn completion_text(outcome: &CompletionOutcome, palette: &Palette) -> String {
    let mut lines = vec![format!(
        "Completed task: {} ({})",
        outcome.task.name, outcome.task.category
    )];
    if outcome.leveled_up {
        lines.push(palette.accentize(&format!("Level up! You reached level {}", outcome.level)));
    }
    lines.push(palette.mutedize(&format!(
        "Streak {} | Level {} | {} / {} XP",
        outcome.streak, outcome.level, outcome.experience, outcome.next_level_threshold
    )));
    lines.join("\n")
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Tasks")]
    count: usize,
    #[tabled(rename = "Progress")]
    bar: String,
}

pub fn dashboard_text(dashboard: &Dashboard, palette: &Palette) -> String {
    let mut lines = Vec::new();
    if let Some(name) = dashboard.username.as_deref() {
        lines.push(format!("Welcome back, {name}!"));
    }
    lines.push(palette.accentize(&format!(
        "Level {} | {} Streak",
        dashboard.level, dashboard.streak
    )));

    let rows: Vec<CategoryRow> = dashboard
        .categories
        .iter()
        .map(|entry| CategoryRow {
            category: entry.category.to_string(),
            count: entry.count,
            bar: progress_bar(entry.ratio),
        })
        .collect();
    lines.push(Table::new(rows).with(Style::rounded()).to_string());

    lines.push(format!(
        "Experience {} {} / {} XP",
        progress_bar(dashboard.experience_ratio),
        dashboard.experience,
        dashboard.next_level_threshold
    ));

    if !dashboard.completed_today.is_empty() {
        lines.push("Completed Tasks".to_string());
        for task in &dashboard.completed_today {
            lines.push(format!(
                "  - {} {}",
                task.name,
                palette.mutedize(&format!("({})", task.category))
            ));
        }
    }

    lines.join("\n")
}
