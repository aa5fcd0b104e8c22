//! Fixed-length countdown.
//!
//! The countdown owns no thread. The caller invokes [`Countdown::tick`] once
//! per second; the tick that reaches zero returns [`CountdownEvent::Completed`]
//! and later ticks return nothing until [`Countdown::reset`].

use serde::Serialize;

pub const DEFAULT_COUNTDOWN_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    duration_secs: u32,
    remaining_secs: u32,
    state: CountdownState,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_SECS)
    }
}

impl Countdown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: CountdownState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// Start or pause. Has no effect once finished.
    pub fn toggle(&mut self) {
        self.state = match self.state {
            CountdownState::Idle | CountdownState::Paused => CountdownState::Running,
            CountdownState::Running => CountdownState::Paused,
            CountdownState::Finished => CountdownState::Finished,
        };
    }

    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.state = CountdownState::Idle;
    }

    pub fn tick(&mut self) -> Option<CountdownEvent> {
        if self.state != CountdownState::Running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = CountdownState::Finished;
            return Some(CountdownEvent::Completed);
        }
        None
    }

    /// 0.0 .. 1.0 elapsed share of the full duration.
    pub fn progress(&self) -> f64 {
        if self.duration_secs == 0 {
            return 1.0;
        }
        (self.duration_secs - self.remaining_secs) as f64 / self.duration_secs as f64
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Countdown, CountdownEvent, CountdownState, DEFAULT_COUNTDOWN_SECS};

    #[test]
    fn default_countdown_is_five_minutes() {
        let countdown = Countdown::default();
        assert_eq!(countdown.duration_secs, DEFAULT_COUNTDOWN_SECS);
        assert_eq!(countdown.display(), "05:00");
        assert_eq!(countdown.state, CountdownState::Idle);
        assert_eq!(countdown.progress(), 0.0);
    }

    #[test]
    fn ticks_are_ignored_until_started() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.remaining_secs, 3);
    }

    #[test]
    fn completes_exactly_once() {
        let mut countdown = Countdown::new(2);
        countdown.toggle();

        assert_eq!(countdown.tick(), None);
        assert_eq!(countdown.display(), "00:01");
        assert_eq!(countdown.tick(), Some(CountdownEvent::Completed));
        assert_eq!(countdown.state, CountdownState::Finished);
        assert_eq!(countdown.progress(), 1.0);
        assert_eq!(countdown.tick(), None);
    }

    #[test]
    fn pause_stops_the_clock() {
        let mut countdown = Countdown::new(90);
        countdown.toggle();
        countdown.tick();
        countdown.toggle();
        countdown.tick();

        assert_eq!(countdown.state, CountdownState::Paused);
        assert_eq!(countdown.display(), "01:29");
    }

    #[test]
    fn toggle_after_finish_keeps_finished() {
        let mut countdown = Countdown::new(1);
        countdown.toggle();
        countdown.tick();
        countdown.toggle();

        assert_eq!(countdown.state, CountdownState::Finished);
    }

    #[test]
    fn reset_restores_full_duration() {
        let mut countdown = Countdown::new(10);
        countdown.toggle();
        for _ in 0..4 {
            countdown.tick();
        }
        assert_eq!(countdown.progress(), 0.4);

        countdown.reset();
        assert_eq!(countdown.remaining_secs, 10);
        assert_eq!(countdown.state, CountdownState::Idle);
        assert!(!countdown.is_running());
    }
}
