//! Event rows and the occurrences projected from them.
//!
//! An [`Event`] is what the storage layer hands us. An [`Occurrence`] is one
//! concrete instance of an event inside a query window; it is built per query
//! and never persisted.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::RecurrenceCategory;

/// Opaque event identifier assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A calendar event as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,

    /// Absent means the event is unscheduled.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,

    #[serde(default)]
    pub recurrence_category: RecurrenceCategory,
    /// Derived from category and end date, never authored directly.
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    #[serde(default)]
    pub recurrence_end_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub subcategory_id: Option<i64>,
    #[serde(default)]
    pub platform_id: Option<i64>,
    #[serde(default)]
    pub responsible_id: Option<i64>,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Minutes before start at which to alert.
    #[serde(default)]
    pub alert_minutes: Option<i64>,
    /// Working days before start at which to send the email alert.
    #[serde(default)]
    pub email_alert_working_days: Option<i64>,
}

impl Event {
    /// A bare event with only an id and a title; everything else empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: EventId(id.into()),
            title: title.into(),
            description: None,
            location: None,
            start: None,
            end: None,
            all_day: false,
            recurrence_category: RecurrenceCategory::None,
            recurrence_rule: None,
            recurrence_end_date: None,
            category_id: None,
            subcategory_id: None,
            platform_id: None,
            responsible_id: None,
            tags: BTreeSet::new(),
            alert_minutes: None,
            email_alert_working_days: None,
        }
    }

    /// `end - start`, or zero when either bound is missing or the end precedes the start.
    pub fn duration(&self) -> Duration {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => end - start,
            _ => Duration::zero(),
        }
    }

    /// True when the event carries a rule and a start to anchor it.
    pub fn is_recurring(&self) -> bool {
        self.recurrence_rule.is_some() && self.start.is_some()
    }
}

/// One materialized instance of an [`Event`] within a query window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub all_day: bool,

    pub occurrence_start: Option<DateTime<Utc>>,
    pub occurrence_end: Option<DateTime<Utc>>,
    /// The defining instant of this instance; equals the event's start for
    /// non-recurring events.
    pub instance_key: Option<DateTime<Utc>>,

    pub recurrence_category: RecurrenceCategory,
    pub recurrence_rule: Option<String>,
    pub recurrence_end_date: Option<DateTime<Utc>>,

    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub platform_id: Option<i64>,
    pub responsible_id: Option<i64>,

    pub tags: BTreeSet<String>,

    pub alert_minutes: Option<i64>,
    pub email_alert_working_days: Option<i64>,
}

impl Occurrence {
    /// The event itself as its only occurrence, with its own start and end.
    pub fn nominal(event: &Event) -> Self {
        Self::project(event, event.start, event.end)
    }

    /// A generated instance starting at `start` and lasting the event's duration.
    pub fn instance(event: &Event, start: DateTime<Utc>) -> Self {
        Self::project(event, Some(start), Some(start + event.duration()))
    }

    fn project(event: &Event, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            all_day: event.all_day,
            occurrence_start: start,
            occurrence_end: end,
            instance_key: start,
            recurrence_category: event.recurrence_category.clone(),
            recurrence_rule: event.recurrence_rule.clone(),
            recurrence_end_date: event.recurrence_end_date,
            category_id: event.category_id,
            subcategory_id: event.subcategory_id,
            platform_id: event.platform_id,
            responsible_id: event.responsible_id,
            tags: event.tags.clone(),
            alert_minutes: event.alert_minutes,
            email_alert_working_days: event.email_alert_working_days,
        }
    }
}
