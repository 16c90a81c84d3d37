use chrono::NaiveTime;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::MeetingTime;

const CLOCK_FORMAT: &str = "%I:%M %p";

/// A class meeting window such as `10:00 AM - 11:15 AM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeSlotParseError {
    #[error("time slot must look like '10:00 AM - 11:15 AM'")]
    MissingSeparator,
    #[error("invalid time '{0}'")]
    InvalidTime(String),
    #[error("time slot must end after it starts")]
    EndsBeforeStart,
}

pub(crate) fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT).ok()
}

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or(TimeSlotParseError::MissingSeparator)?;

        let start = parse_clock(start)
            .ok_or_else(|| TimeSlotParseError::InvalidTime(start.trim().to_string()))?;
        let end = parse_clock(end)
            .ok_or_else(|| TimeSlotParseError::InvalidTime(end.trim().to_string()))?;

        if end <= start {
            return Err(TimeSlotParseError::EndsBeforeStart);
        }

        Ok(TimeSlot { start, end })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%-I:%M %p"),
            self.end.format("%-I:%M %p")
        )
    }
}

impl TimeSlot {
    /// True when the meeting starts and ends exactly on this slot.
    pub fn matches(&self, meeting: &MeetingTime) -> bool {
        parse_clock(&meeting.start_time) == Some(self.start)
            && parse_clock(&meeting.end_time) == Some(self.end)
    }
}
