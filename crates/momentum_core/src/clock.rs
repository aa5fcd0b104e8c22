//! Injectable source of "now".
//!
//! Suggestions depend on the local hour and log pruning depends on the local
//! calendar date, so both read time through [`Clock`] instead of the system
//! clock directly.

use crate::error::AppError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

const NOW_ENV_VAR: &str = "MOMENTUM_NOW";

pub trait Clock {
    /// Current instant expressed in the user's local offset.
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().date()
    }

    fn hour(&self) -> u8 {
        self.now().hour()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(local_offset())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

/// Uses `MOMENTUM_NOW` (RFC 3339) when set, the system clock otherwise.
pub fn clock_from_env() -> Result<Box<dyn Clock>, AppError> {
    match std::env::var(NOW_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => {
            let now = OffsetDateTime::parse(value.trim(), &Rfc3339)
                .map_err(|_| AppError::invalid_input(format!("{NOW_ENV_VAR} must be RFC3339")))?;
            Ok(Box::new(FixedClock(now)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}

pub fn date_key(date: Date) -> Result<String, AppError> {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn parse_date_key(key: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(key.trim(), &format).ok()
}

pub fn timestamp(now: OffsetDateTime) -> Result<String, AppError> {
    now.format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
