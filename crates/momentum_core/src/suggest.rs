use crate::catalog::{TimeSlot, suggestions_for};
use crate::clock::Clock;
use crate::model::{CategoryId, CompletedTask};
use std::collections::HashSet;

/// How many of the latest completions in a category hide a suggestion.
pub const RECENT_WINDOW: usize = 3;

pub fn suggest(
    clock: &dyn Clock,
    category: CategoryId,
    completed_today: &[CompletedTask],
) -> Vec<&'static str> {
    let slot = TimeSlot::from_hour(clock.hour());
    suggest_for_slot(slot, category, completed_today)
}

/// Catalog candidates for `slot` minus the names of the last
/// [`RECENT_WINDOW`] tasks completed today in `category`, in catalog order.
pub fn suggest_for_slot(
    slot: TimeSlot,
    category: CategoryId,
    completed_today: &[CompletedTask],
) -> Vec<&'static str> {
    let recent: HashSet<&str> = completed_today
        .iter()
        .filter(|task| task.category == category)
        .rev()
        .take(RECENT_WINDOW)
        .map(|task| task.name.as_str())
        .collect();

    suggestions_for(category, slot)
        .iter()
        .copied()
        .filter(|name| !recent.contains(name))
        .collect()
}
