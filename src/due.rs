//! Read-time due-date derivation.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue { days: i64 },
    Today,
    Tomorrow,
    InDays(i64),
}

impl DueStatus {
    /// Both ends are truncated to calendar days before subtracting.
    pub fn on(due: NaiveDate, today: NaiveDate) -> Self {
        let diff = (due - today).num_days();
        match diff {
            d if d < 0 => DueStatus::Overdue { days: d.abs() },
            0 => DueStatus::Today,
            1 => DueStatus::Tomorrow,
            d => DueStatus::InDays(d),
        }
    }

    pub fn between(due: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self::on(due.date(), now.date())
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DueStatus::Overdue { .. })
    }

    pub fn days_until_due(&self) -> i64 {
        match *self {
            DueStatus::Overdue { days } => -days,
            DueStatus::Today => 0,
            DueStatus::Tomorrow => 1,
            DueStatus::InDays(d) => d,
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::Overdue { days } => write!(f, "{} days overdue", days),
            DueStatus::Today => write!(f, "Due today"),
            DueStatus::Tomorrow => write!(f, "Due tomorrow"),
            DueStatus::InDays(d) => write!(f, "Due in {} days", d),
        }
    }
}

/// Parses the timestamp shapes the backend emits: RFC3339, naive ISO
/// (with or without fractional seconds), or a bare date.
pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(ts, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
