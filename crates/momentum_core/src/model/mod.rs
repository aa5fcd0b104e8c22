mod progress;
mod task;

pub use progress::{EXPERIENCE_PER_LEVEL, EXPERIENCE_PER_TASK, MAX_LEVEL, ProgressState};
pub use task::{CategoryId, CompletedTask, DailyTaskLog, TaskHistory};
