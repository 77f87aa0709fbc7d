//! Alert offsets and the instants they resolve to for an occurrence.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::event::Occurrence;

/// Alert choices offered when editing an event, keyed by their label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertOffset {
    #[default]
    None,
    AtStart,
    FiveMinutes,
    TenMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    OneHour,
    TwoHours,
    OneDay,
    TwoDays,
    OneWeek,
    Unrecognized(String),
}

impl AlertOffset {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "" | "none" => Self::None,
            "at start" => Self::AtStart,
            "5 minutes" => Self::FiveMinutes,
            "10 minutes" => Self::TenMinutes,
            "15 minutes" => Self::FifteenMinutes,
            "30 minutes" => Self::ThirtyMinutes,
            "1 hour" => Self::OneHour,
            "2 hours" => Self::TwoHours,
            "1 day" => Self::OneDay,
            "2 days" => Self::TwoDays,
            "1 week" => Self::OneWeek,
            _ => Self::Unrecognized(label.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::None => "none",
            Self::AtStart => "at start",
            Self::FiveMinutes => "5 minutes",
            Self::TenMinutes => "10 minutes",
            Self::FifteenMinutes => "15 minutes",
            Self::ThirtyMinutes => "30 minutes",
            Self::OneHour => "1 hour",
            Self::TwoHours => "2 hours",
            Self::OneDay => "1 day",
            Self::TwoDays => "2 days",
            Self::OneWeek => "1 week",
            Self::Unrecognized(label) => label,
        }
    }

    /// Minutes before start, or `None` when no alert applies.
    pub fn minutes(&self) -> Option<i64> {
        match self {
            Self::None | Self::Unrecognized(_) => None,
            Self::AtStart => Some(0),
            Self::FiveMinutes => Some(5),
            Self::TenMinutes => Some(10),
            Self::FifteenMinutes => Some(15),
            Self::ThirtyMinutes => Some(30),
            Self::OneHour => Some(60),
            Self::TwoHours => Some(120),
            Self::OneDay => Some(24 * 60),
            Self::TwoDays => Some(2 * 24 * 60),
            Self::OneWeek => Some(7 * 24 * 60),
        }
    }
}

impl From<String> for AlertOffset {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<AlertOffset> for String {
    fn from(offset: AlertOffset) -> Self {
        offset.as_label().to_string()
    }
}

impl fmt::Display for AlertOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The date `days` working days (Monday to Friday) before `date`.
///
/// With `days == 0` a weekend date moves back to the preceding Friday.
/// Negative counts are treated as zero. Returns `None` when the result falls
/// outside the representable date range.
pub fn subtract_working_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let one_day = Days::new(1);
    let mut current = date;
    while is_weekend(current) {
        current = current.checked_sub_days(one_day)?;
    }

    // From a weekday, each whole week back is exactly five working days.
    let days = days.max(0).unsigned_abs();
    current = current.checked_sub_days(Days::new((days / 5).checked_mul(7)?))?;

    let mut remaining = days % 5;
    while remaining > 0 {
        current = current.checked_sub_days(one_day)?;
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    Some(current)
}

impl Occurrence {
    /// Instant of the in-app alert: start minus `alert_minutes`.
    ///
    /// `None` when either is unset or the offset overflows.
    pub fn alert_at(&self) -> Option<DateTime<Utc>> {
        let start = self.occurrence_start?;
        let offset = TimeDelta::try_minutes(self.alert_minutes?)?;
        start.checked_sub_signed(offset)
    }

    /// Date on which the email alert goes out.
    pub fn email_alert_on(&self) -> Option<NaiveDate> {
        let start = self.occurrence_start?;
        subtract_working_days(start.date_naive(), self.email_alert_working_days?)
    }
}
