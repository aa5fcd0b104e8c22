use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Work,
    Personal,
    Fitness,
}

impl CategoryId {
    pub const ALL: [CategoryId; 3] = [CategoryId::Work, CategoryId::Personal, CategoryId::Fitness];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Fitness => "fitness",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        CategoryId::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AppError::invalid_input(format!("unknown category '{trimmed}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub name: String,
    pub category: CategoryId,
    pub timestamp: String,
}

/// Every task name ever completed, per category, oldest first.
pub type TaskHistory = BTreeMap<CategoryId, Vec<String>>;

/// Completed tasks keyed by local calendar date (`YYYY-MM-DD`).
pub type DailyTaskLog = BTreeMap<String, Vec<CompletedTask>>;
