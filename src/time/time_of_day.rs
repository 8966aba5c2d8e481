use std::{fmt, str::FromStr};

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::duration::parse_digits;
use crate::error::ValidationError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Am,
    Pm,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Am => f.write_str("AM"),
            Period::Pm => f.write_str("PM"),
        }
    }
}

/// Wall-clock time with minute precision. Not tied to any date or timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_second(0)
            .and_then(|time| time.with_nanosecond(0))
            .expect("Will never fail.");
        Self(normalized_time)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Builds a time from minutes since midnight, wrapping around the day.
    pub fn from_minutes_wrapping(minutes: u64) -> Self {
        let minutes = (minutes % MINUTES_PER_DAY as u64) as u32;
        Self::from_hm(minutes / 60, minutes % 60).expect("Always in range after wrapping.")
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    pub fn time(&self) -> &NaiveTime {
        &self.0
    }

    pub fn display_hour(&self) -> u32 {
        match self.hour() % 12 {
            0 => 12,
            hour => hour,
        }
    }

    pub fn period(&self) -> Period {
        if self.hour() >= 12 { Period::Pm } else { Period::Am }
    }

    /// `09:05 AM`, the zero-padded form shown in the start time field.
    pub fn to_padded_12_hour(&self) -> String {
        format!(
            "{:02}:{:02} {}",
            self.display_hour(),
            self.minute(),
            self.period()
        )
    }

    /// `21:05`
    pub fn to_24_hour(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Renders as `9:05 PM`.
impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02} {}",
            self.display_hour(),
            self.minute(),
            self.period()
        )
    }
}

/// Accepts `HH:MM` on a 24 hour clock or `hh:mm AM|PM` on a 12 hour clock.
impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedTime(s.to_string());
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        let (clock, period) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(Period::Am))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(Period::Pm))
        } else {
            (upper.as_str(), None)
        };

        let (hour, minute) = clock.split_once(':').ok_or_else(malformed)?;
        let hour = parse_digits(hour).ok_or_else(malformed)?;
        let minute = parse_digits(minute).ok_or_else(malformed)?;

        let hour = match period {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => return Err(malformed()),
            Some(Period::Am) if hour == 12 => 0,
            Some(Period::Am) => hour,
            Some(Period::Pm) if hour == 12 => 12,
            Some(Period::Pm) => hour + 12,
        };

        Self::from_hm(hour, minute).ok_or_else(malformed)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}
