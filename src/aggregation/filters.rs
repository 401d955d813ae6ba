//! Calendar-window predicates over heartbeats.
//!
//! Windows are evaluated in local calendar time against a fresh "now" on
//! every call. The `_at` variants take "now" explicitly, in any time zone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Local, NaiveDateTime, NaiveTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};

use crate::models::Heartbeat;

const LOOKBACK_DAYS: u64 = 7;

/// True if the heartbeat falls on today's local calendar date.
pub fn from_today(heartbeat: &Heartbeat) -> bool {
    from_today_at(heartbeat, &Local::now())
}

/// True if the heartbeat falls between 00:00 seven days ago and 23:59:59.999
/// today, local time, both ends inclusive.
pub fn from_last_seven_days(heartbeat: &Heartbeat) -> bool {
    from_last_seven_days_at(heartbeat, &Local::now())
}

pub fn from_today_at<Tz: TimeZone>(heartbeat: &Heartbeat, now: &DateTime<Tz>) -> bool {
    match heartbeat.timestamp() {
        Some(time) => time.with_timezone(&now.timezone()).date_naive() == now.date_naive(),
        None => false,
    }
}

pub fn from_last_seven_days_at<Tz: TimeZone>(heartbeat: &Heartbeat, now: &DateTime<Tz>) -> bool {
    let today = now.date_naive();
    let Some(first_day) = today.checked_sub_days(Days::new(LOOKBACK_DAYS)) else {
        return false;
    };
    let Some(end_of_today) = NaiveTime::from_hms_milli_opt(23, 59, 59, 999) else {
        return false;
    };

    let zone = now.timezone();
    let start = local_millis(&zone, first_day.and_time(NaiveTime::MIN), true);
    let end = local_millis(&zone, today.and_time(end_of_today), false);

    heartbeat.time >= start && heartbeat.time <= end
}

/// Epoch milliseconds of a local wall-clock time.
///
/// Ambiguous times resolve to the earliest or latest instant as asked. Times
/// skipped by a clock change use the zone's offset at that UTC moment.
fn local_millis<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime, earliest: bool) -> i64 {
    let mapped = zone.from_local_datetime(&local);
    let resolved = if earliest {
        mapped.earliest()
    } else {
        mapped.latest()
    };
    match resolved {
        Some(instant) => instant.timestamp_millis(),
        None => {
            let offset = zone.offset_from_utc_datetime(&local).fix();
            local.and_utc().timestamp_millis() - i64::from(offset.local_minus_utc()) * 1_000
        }
    }
}

/// A named calendar window for filtering heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindow {
    Today,
    Week,
    #[default]
    All,
}

impl DateWindow {
    pub fn matches(&self, heartbeat: &Heartbeat) -> bool {
        self.matches_at(heartbeat, &Local::now())
    }

    pub fn matches_at<Tz: TimeZone>(&self, heartbeat: &Heartbeat, now: &DateTime<Tz>) -> bool {
        match self {
            DateWindow::Today => from_today_at(heartbeat, now),
            DateWindow::Week => from_last_seven_days_at(heartbeat, now),
            DateWindow::All => true,
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateWindow::Today => "today",
            DateWindow::Week => "week",
            DateWindow::All => "all",
        })
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "today" => Ok(DateWindow::Today),
            "week" | "7d" => Ok(DateWindow::Week),
            "all" => Ok(DateWindow::All),
            _ => Err(format!("unknown date window '{value}'")),
        }
    }
}
