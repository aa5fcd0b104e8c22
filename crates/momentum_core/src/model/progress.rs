use serde::{Deserialize, Serialize};

pub const EXPERIENCE_PER_TASK: u32 = 20;
pub const EXPERIENCE_PER_LEVEL: u32 = 100;
/// Highest level whose threshold still fits in a `u32`.
pub const MAX_LEVEL: u32 = u32::MAX / EXPERIENCE_PER_LEVEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub streak: u32,
    pub level: u32,
    pub experience: u32,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            streak: 0,
            level: 1,
            experience: 0,
        }
    }
}

impl ProgressState {
    /// Experience needed to leave the current level. Used both for the
    /// level-up check and for the progress bar.
    pub fn next_level_threshold(&self) -> u32 {
        self.level.max(1).saturating_mul(EXPERIENCE_PER_LEVEL)
    }

    /// Returns the state after one completed task and whether it levelled up.
    pub fn record_completion(self) -> (Self, bool) {
        let threshold = self.next_level_threshold();
        let experience = self.experience.saturating_add(EXPERIENCE_PER_TASK);
        let streak = self.streak.saturating_add(1);

        if experience >= threshold {
            let next = Self {
                streak,
                level: self.level.saturating_add(1).min(MAX_LEVEL),
                experience: experience - threshold,
            };
            (next, true)
        } else {
            let next = Self {
                streak,
                level: self.level,
                experience,
            };
            (next, false)
        }
    }

    /// Brings stored values back inside `1 <= level <= MAX_LEVEL` and
    /// `experience < level * 100`, carrying surplus experience into levels.
    pub fn normalized(self) -> Self {
        let mut state = self;
        state.level = state.level.clamp(1, MAX_LEVEL);
        while state.level < MAX_LEVEL && state.experience >= state.next_level_threshold() {
            state.experience -= state.next_level_threshold();
            state.level += 1;
        }
        if state.level == MAX_LEVEL {
            state.experience = state.experience.min(state.next_level_threshold() - 1);
        }
        state
    }
}
