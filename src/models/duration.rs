use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A reconstructed span of continuous activity, in epoch milliseconds.
///
/// `length` is always `end - start`; it is recomputed whenever the span
/// changes and on deserialization, never taken from stored input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDuration")]
pub struct Duration {
    start: i64,
    end: i64,
    length: i64,
}

#[derive(Deserialize)]
struct RawDuration {
    start: i64,
    end: i64,
}

impl TryFrom<RawDuration> for Duration {
    type Error = EngineError;

    fn try_from(raw: RawDuration) -> Result<Self, Self::Error> {
        Duration::new(raw.start, raw.end)
    }
}

impl Duration {
    pub fn new(start: i64, end: i64) -> Result<Self, EngineError> {
        if end < start {
            return Err(EngineError::invalid(format!(
                "duration end {end} precedes start {start}"
            )));
        }
        let length = end.checked_sub(start).ok_or_else(|| {
            EngineError::invalid(format!("duration from {start} to {end} overflows"))
        })?;
        Ok(Self { start, end, length })
    }

    /// A zero-length span at a single instant.
    pub fn point(time: i64) -> Self {
        Self {
            start: time,
            end: time,
            length: 0,
        }
    }

    pub(crate) fn extend_to(&mut self, time: i64) {
        if time > self.end {
            self.end = time;
            self.length = self.end - self.start;
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.length)
    }
}

/// Whole hours, minutes and seconds for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadableDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ReadableDuration {
    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for ReadableDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours > 0 {
            write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
        } else if self.minutes > 0 {
            write!(f, "{}m {}s", self.minutes, self.seconds)
        } else {
            write!(f, "{}s", self.seconds)
        }
    }
}
