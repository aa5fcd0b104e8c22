use crate::catalog::breakdown_patterns_for;
use crate::error::AppError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub pattern: &'static str,
    pub subtasks: Vec<&'static str>,
}

/// Splits free text into the subtasks of the first matching pattern.
///
/// `None` means the text should be worked on as-is. Picking any subtask is
/// completed the same way as picking the original text.
pub fn breakdown(task_text: &str) -> Option<Breakdown> {
    let (pattern, subtasks) = breakdown_patterns_for(task_text)?;
    Some(Breakdown {
        pattern,
        subtasks: subtasks.to_vec(),
    })
}

/// What a submitted task resolves to before it can be completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Complete this name.
    Task(String),
    /// The text has subtasks and one of them has to be picked first.
    Choose(Breakdown),
}

/// Resolves free text against the breakdown patterns.
///
/// Text with a breakdown is never completed as itself: without a 1-based
/// `step` the caller gets the subtasks to choose from. A `step` for text
/// without a breakdown is rejected.
pub fn select(task_text: &str, step: Option<usize>) -> Result<Selection, AppError> {
    let trimmed = task_text.trim();
    match (breakdown(trimmed), step) {
        (None, None) => Ok(Selection::Task(trimmed.to_string())),
        (None, Some(_)) => Err(AppError::invalid_input(format!(
            "'{trimmed}' has no steps to choose from"
        ))),
        (Some(found), None) => Ok(Selection::Choose(found)),
        (Some(found), Some(step)) => {
            let chosen = step
                .checked_sub(1)
                .and_then(|index| found.subtasks.get(index));
            match chosen {
                Some(subtask) => Ok(Selection::Task((*subtask).to_string())),
                None => Err(AppError::invalid_input(format!(
                    "step must be between 1 and {}",
                    found.subtasks.len()
                ))),
            }
        }
    }
}
