mod duration;
mod time_of_day;

pub use duration::ShiftDuration;
pub use time_of_day::{MINUTES_PER_DAY, Period, TimeOfDay};

use chrono::NaiveDateTime;

use crate::{clock::Clock, error::ValidationError};

/// Adds `duration` to `start`, wrapping past midnight. The day boundary is not tracked.
pub fn compute_end_time(start: TimeOfDay, duration: ShiftDuration) -> TimeOfDay {
    let minutes = start.minutes_since_midnight() as u64 + duration.total_minutes();
    TimeOfDay::from_minutes_wrapping(minutes)
}

pub fn parse_duration(input: &str) -> Result<ShiftDuration, ValidationError> {
    input.parse()
}

pub fn time_of_day_at(now: NaiveDateTime) -> TimeOfDay {
    TimeOfDay::new(now.time())
}

pub fn now_as_time_of_day(clock: &dyn Clock) -> TimeOfDay {
    time_of_day_at(clock.now())
}
