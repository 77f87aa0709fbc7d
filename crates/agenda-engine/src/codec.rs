//! Recurrence codec -- converts a recurrence category plus an optional end date
//! into a canonical RRULE string, and parses that string back.
//!
//! The persisted rule grammar is the RFC 5545 subset
//! `FREQ=<WEEKLY|MONTHLY|YEARLY>[;INTERVAL=<n>][;UNTIL=<YYYYMMDDTHHMMSSZ>]`.
//! Expansion itself goes through the `rrule` crate, see [`RecurrenceParams::to_rrule_set`].

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AgendaError, Result};

const ICAL_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Human-facing recurrence category attached to an event.
///
/// Serialized as its lowercase label. Labels that do not name a known
/// category are kept verbatim in [`RecurrenceCategory::Unrecognized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecurrenceCategory {
    #[default]
    None,
    /// Accepted as input but has no rule mapping.
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Semestrial,
    Yearly,
    Unrecognized(String),
}

impl RecurrenceCategory {
    /// Map a label onto a category. Total: unknown labels become `Unrecognized`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "" | "none" | "never" => Self::None,
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            "semestrial" | "biannual" | "semiannual" => Self::Semestrial,
            "yearly" | "annually" => Self::Yearly,
            _ => Self::Unrecognized(label.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Semestrial => "semestrial",
            Self::Yearly => "yearly",
            Self::Unrecognized(label) => label,
        }
    }

    /// The frequency/interval pair this category encodes to, if any.
    pub fn frequency_interval(&self) -> Option<(Frequency, u32)> {
        match self {
            Self::Weekly => Some((Frequency::Weekly, 1)),
            Self::Monthly => Some((Frequency::Monthly, 1)),
            Self::Quarterly => Some((Frequency::Monthly, 3)),
            Self::Semestrial => Some((Frequency::Monthly, 6)),
            Self::Yearly => Some((Frequency::Yearly, 1)),
            Self::None | Self::Daily | Self::Unrecognized(_) => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<String> for RecurrenceCategory {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<RecurrenceCategory> for String {
    fn from(category: RecurrenceCategory) -> Self {
        category.as_label().to_string()
    }
}

impl fmt::Display for RecurrenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// RRULE `FREQ` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// A decoded recurrence rule bound to its anchor (the owning event's start).
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceParams {
    pub frequency: Frequency,
    pub interval: u32,
    /// Inclusive upper bound on generated instances.
    pub until: Option<DateTime<Utc>>,
    pub anchor: DateTime<Utc>,
}

impl RecurrenceParams {
    /// Render the canonical rule string (without DTSTART).
    pub fn to_rule_string(&self) -> String {
        render_rule(self.frequency, self.interval, self.until)
    }

    /// Build an `rrule` set anchored at `self.anchor`.
    ///
    /// The anchor is truncated to whole seconds; callers add the sub-second
    /// remainder back to each generated date.
    pub fn to_rrule_set(&self) -> Result<RRuleSet> {
        let text = format!(
            "DTSTART:{}\nRRULE:{}",
            format_ical_utc(self.anchor),
            self.to_rule_string()
        );
        text.parse()
            .map_err(|e| AgendaError::MalformedRule(format!("{}", e)))
    }
}

/// Encode a category and optional end date into a canonical rule string.
///
/// Returns `None` for `None`, for `Daily` (no interval mapping) and for
/// unrecognized categories. Never fails; see [`try_encode`] for the strict form.
pub fn encode(category: &RecurrenceCategory, until: Option<DateTime<Utc>>) -> Option<String> {
    match category.frequency_interval() {
        Some((frequency, interval)) => Some(render_rule(frequency, interval, until)),
        None => {
            match category {
                RecurrenceCategory::None => {}
                RecurrenceCategory::Daily => {
                    warn!("recurrence category 'daily' has no rule mapping; storing no rule")
                }
                other => warn!(category = %other, "unrecognized recurrence category; storing no rule"),
            }
            None
        }
    }
}

/// Strict encoding: categories without a rule mapping (other than `None`) are errors.
///
/// # Errors
/// Returns `AgendaError::UnrecognizedCategory` for `Daily` and `Unrecognized(_)`.
pub fn try_encode(
    category: &RecurrenceCategory,
    until: Option<DateTime<Utc>>,
) -> Result<Option<String>> {
    match category {
        RecurrenceCategory::Daily | RecurrenceCategory::Unrecognized(_) => Err(
            AgendaError::UnrecognizedCategory(category.as_label().to_string()),
        ),
        _ => Ok(encode(category, until)),
    }
}

/// Decode a canonical rule string and bind it to `anchor`.
///
/// A leading `RRULE:` prefix is tolerated, keys and tokens are case-insensitive
/// and `INTERVAL` defaults to 1.
///
/// # Errors
/// Returns `AgendaError::MalformedRule` when the string is empty, lacks a valid
/// `FREQ`, repeats a key, carries an unsupported key, or has an unparseable
/// `INTERVAL`/`UNTIL`.
pub fn decode(rule: &str, anchor: DateTime<Utc>) -> Result<RecurrenceParams> {
    let trimmed = rule.trim();
    let body = trimmed.strip_prefix("RRULE:").unwrap_or(trimmed);
    if body.is_empty() {
        return Err(malformed("empty rule string"));
    }

    let mut frequency = None;
    let mut interval = None;
    let mut until = None;

    for part in body.split(';').filter(|p| !p.trim().is_empty()) {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| malformed(format!("missing '=' in '{}'", part)))?;
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();

        match key.as_str() {
            "FREQ" if frequency.is_none() => {
                frequency = Some(
                    Frequency::from_token(value)
                        .ok_or_else(|| malformed(format!("unsupported FREQ '{}'", value)))?,
                );
            }
            "INTERVAL" if interval.is_none() => {
                let n: u32 = value
                    .parse()
                    .map_err(|_| malformed(format!("invalid INTERVAL '{}'", value)))?;
                if n == 0 {
                    return Err(malformed("INTERVAL must be at least 1"));
                }
                interval = Some(n);
            }
            "UNTIL" if until.is_none() => {
                until = Some(
                    parse_ical_utc(value)
                        .ok_or_else(|| malformed(format!("invalid UNTIL '{}'", value)))?,
                );
            }
            "FREQ" | "INTERVAL" | "UNTIL" => {
                return Err(malformed(format!("duplicate {}", key)));
            }
            _ => return Err(malformed(format!("unsupported rule part '{}'", part))),
        }
    }

    let frequency = frequency.ok_or_else(|| malformed("missing FREQ"))?;

    Ok(RecurrenceParams {
        frequency,
        interval: interval.unwrap_or(1),
        until,
        anchor,
    })
}

/// Format an instant as an iCalendar UTC basic timestamp (`20240201T000000Z`),
/// dropping sub-second precision.
pub fn format_ical_utc(dt: DateTime<Utc>) -> String {
    dt.trunc_subsecs(0).format(ICAL_UTC_FORMAT).to_string()
}

/// Parse an iCalendar basic timestamp as UTC.
///
/// Accepts `YYYYMMDDTHHMMSS` with or without a trailing `Z`, and a bare
/// `YYYYMMDD` date (midnight UTC).
pub fn parse_ical_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let value = value.strip_suffix(['Z', 'z']).unwrap_or(value);
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn render_rule(frequency: Frequency, interval: u32, until: Option<DateTime<Utc>>) -> String {
    let mut rule = format!("FREQ={};INTERVAL={}", frequency.as_token(), interval);
    if let Some(until) = until {
        rule.push_str(";UNTIL=");
        rule.push_str(&format_ical_utc(until));
    }
    rule
}

fn malformed(message: impl Into<String>) -> AgendaError {
    AgendaError::MalformedRule(message.into())
}
