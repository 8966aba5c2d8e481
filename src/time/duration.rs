use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Elapsed work time entered as `H:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShiftDuration {
    hours: u32,
    minutes: u32,
}

impl ShiftDuration {
    pub fn new(hours: u32, minutes: u32) -> Option<Self> {
        (minutes < 60).then_some(Self { hours, minutes })
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> u64 {
        self.hours as u64 * 60 + self.minutes as u64
    }
}

impl fmt::Display for ShiftDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

impl FromStr for ShiftDuration {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(ValidationError::DurationRequired);
        }

        let malformed = || ValidationError::MalformedDuration(input.to_string());
        let segments: Vec<&str> = input.split(':').collect();
        let [hours, minutes] = segments.as_slice() else {
            return Err(malformed());
        };

        let hours = parse_digits(hours).ok_or_else(malformed)?;
        let minutes = parse_digits(minutes).ok_or_else(malformed)?;

        Self::new(hours, minutes).ok_or(ValidationError::MinutesOutOfRange(minutes))
    }
}

/// Parses a segment made only of ASCII digits, so signs like `+2` are refused.
pub(crate) fn parse_digits(segment: &str) -> Option<u32> {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

impl TryFrom<String> for ShiftDuration {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShiftDuration> for String {
    fn from(value: ShiftDuration) -> Self {
        value.to_string()
    }
}
