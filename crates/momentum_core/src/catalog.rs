//! Static suggestion and breakdown tables.

use crate::model::CategoryId;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    /// `[0,12)` morning, `[12,17)` afternoon, everything later evening.
    pub fn from_hour(hour: u8) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type SlotSuggestions = [&'static str; 4];
pub type Subtasks = [&'static str; 5];

const WORK: [SlotSuggestions; 3] = [
    [
        "Review today's priorities",
        "Check important emails",
        "Plan daily schedule",
        "Set up workspace",
    ],
    [
        "Follow up on meetings",
        "Update task progress",
        "Clear inbox",
        "Review deadlines",
    ],
    [
        "Plan tomorrow's tasks",
        "Organize files",
        "Send status updates",
        "Clean up workspace",
    ],
];

const PERSONAL: [SlotSuggestions; 3] = [
    [
        "Quick meditation",
        "Journal entry",
        "Read article",
        "Plan personal goals",
    ],
    [
        "Take a break",
        "Declutter space",
        "Learn something new",
        "Personal correspondence",
    ],
    [
        "Reflect on day",
        "Prepare for tomorrow",
        "Relaxation exercise",
        "Reading time",
    ],
];

const FITNESS: [SlotSuggestions; 3] = [
    [
        "Morning stretch",
        "Quick cardio",
        "Hydration check",
        "Plan workout",
    ],
    [
        "Desk exercises",
        "Walk break",
        "Posture check",
        "Quick workout",
    ],
    [
        "Evening yoga",
        "Light stretching",
        "Recovery exercises",
        "Mobility work",
    ],
];

/// Checked top to bottom; the first pattern contained in the task text wins,
/// so "clean and organize the garage" resolves to `organize`.
pub const BREAKDOWN_PATTERNS: &[(&str, Subtasks)] = &[
    (
        "prepare for meeting",
        [
            "Review meeting agenda",
            "Gather relevant documents",
            "Write key talking points",
            "Set up presentation",
            "Check meeting tools",
        ],
    ),
    (
        "write report",
        [
            "Create outline",
            "Write introduction",
            "Draft main sections",
            "Add conclusions",
            "Review and edit",
        ],
    ),
    (
        "organize",
        [
            "Sort items by category",
            "Remove unnecessary items",
            "Create organization system",
            "Label items",
            "Put items in place",
        ],
    ),
    (
        "clean",
        [
            "Clear surfaces",
            "Dust and wipe",
            "Organize items",
            "Vacuum/sweep",
            "Final touches",
        ],
    ),
];

pub fn suggestions_for(category: CategoryId, slot: TimeSlot) -> &'static SlotSuggestions {
    let table = match category {
        CategoryId::Work => &WORK,
        CategoryId::Personal => &PERSONAL,
        CategoryId::Fitness => &FITNESS,
    };

    match slot {
        TimeSlot::Morning => &table[0],
        TimeSlot::Afternoon => &table[1],
        TimeSlot::Evening => &table[2],
    }
}

/// Returns the matching pattern key together with its subtasks.
pub fn breakdown_patterns_for(text: &str) -> Option<(&'static str, &'static Subtasks)> {
    let lowered = text.to_lowercase();
    BREAKDOWN_PATTERNS
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(pattern, subtasks)| (*pattern, subtasks))
}
