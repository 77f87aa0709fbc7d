//! Write path -- event creation and partial updates.
//!
//! Update payloads distinguish a field that was left out from one explicitly
//! set to `null`; see [`Patch`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::alert::AlertOffset;
use crate::codec::{self, RecurrenceCategory};
use crate::error::{AgendaError, Result};
use crate::event::Event;
use crate::tags::parse_tags;

/// One field of an update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key missing from the payload: leave the field unchanged.
    Absent,
    /// Key present with `null`: clear the field.
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// `None` when absent, `Some(None)` when null, `Some(Some(v))` when set.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Absent => None,
            Self::Null => Some(None),
            Self::Value(v) => Some(Some(v)),
        }
    }

    /// Write into a nullable field unless absent.
    pub fn apply_to(self, field: &mut Option<T>) {
        if let Some(value) = self.into_option() {
            *field = value;
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(|value| value.map_or(Self::Null, Self::Value))
    }
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub recurrence_category: RecurrenceCategory,
    pub recurrence_end_date: Option<DateTime<Utc>>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub platform_id: Option<i64>,
    pub responsible_id: Option<i64>,
    /// Raw tag text, parsed with [`parse_tags`].
    pub tags: Option<String>,
    pub alert: AlertOffset,
    pub email_alert_working_days: Option<i64>,
}

/// Update payload: only fields present in the payload change.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPatch {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub location: Patch<String>,
    pub start: Patch<DateTime<Utc>>,
    pub end: Patch<DateTime<Utc>>,
    pub all_day: Patch<bool>,
    pub recurrence_category: Patch<RecurrenceCategory>,
    pub recurrence_end_date: Patch<DateTime<Utc>>,
    pub category_id: Patch<i64>,
    pub subcategory_id: Patch<i64>,
    pub platform_id: Patch<i64>,
    pub responsible_id: Patch<i64>,
    /// Raw tag text; when present the tag set is replaced wholesale.
    pub tags: Patch<String>,
    pub alert: Patch<AlertOffset>,
    pub email_alert_working_days: Patch<i64>,
}

impl Event {
    /// Build a validated event from a create payload.
    ///
    /// # Errors
    /// `EmptyTitle` if the title is blank, `RuleWithoutStart` if the category
    /// produces a rule but no start was given.
    pub fn create(id: impl Into<String>, draft: NewEvent) -> Result<Self> {
        let mut event = Event::new(id, draft.title);
        event.description = draft.description;
        event.location = draft.location;
        event.start = draft.start;
        event.end = draft.end;
        event.all_day = draft.all_day;
        event.recurrence_category = draft.recurrence_category;
        event.recurrence_end_date = draft.recurrence_end_date;
        event.category_id = draft.category_id;
        event.subcategory_id = draft.subcategory_id;
        event.platform_id = draft.platform_id;
        event.responsible_id = draft.responsible_id;
        event.tags = draft.tags.as_deref().map(parse_tags).unwrap_or_default();
        event.alert_minutes = draft.alert.minutes();
        event.email_alert_working_days = draft.email_alert_working_days;

        event.recurrence_rule = codec::encode(&event.recurrence_category, event.recurrence_end_date);
        event.finalize()?;
        Ok(event)
    }

    /// Apply a partial update. The event is left untouched on error.
    ///
    /// The recurrence rule is re-derived when the category or end date is
    /// part of the patch.
    ///
    /// # Errors
    /// Same as [`Event::create`].
    pub fn apply_patch(&mut self, patch: EventPatch) -> Result<()> {
        let mut next = self.clone();
        let recurrence_changed =
            !patch.recurrence_category.is_absent() || !patch.recurrence_end_date.is_absent();

        match patch.title.into_option() {
            Some(Some(title)) => next.title = title,
            Some(None) => return Err(AgendaError::EmptyTitle),
            None => {}
        }
        patch.description.apply_to(&mut next.description);
        patch.location.apply_to(&mut next.location);
        patch.start.apply_to(&mut next.start);
        patch.end.apply_to(&mut next.end);
        if let Some(all_day) = patch.all_day.into_option() {
            next.all_day = all_day.unwrap_or(false);
        }
        if let Some(category) = patch.recurrence_category.into_option() {
            next.recurrence_category = category.unwrap_or_default();
        }
        patch.recurrence_end_date.apply_to(&mut next.recurrence_end_date);
        patch.category_id.apply_to(&mut next.category_id);
        patch.subcategory_id.apply_to(&mut next.subcategory_id);
        patch.platform_id.apply_to(&mut next.platform_id);
        patch.responsible_id.apply_to(&mut next.responsible_id);
        if let Some(raw) = patch.tags.into_option() {
            next.tags = raw.as_deref().map(parse_tags).unwrap_or_default();
        }
        if let Some(alert) = patch.alert.into_option() {
            next.alert_minutes = alert.and_then(|a| a.minutes());
        }
        patch
            .email_alert_working_days
            .apply_to(&mut next.email_alert_working_days);

        if recurrence_changed {
            next.recurrence_rule =
                codec::encode(&next.recurrence_category, next.recurrence_end_date);
        }
        next.finalize()?;
        *self = next;
        Ok(())
    }

    /// Trim the title and enforce the rule invariants.
    fn finalize(&mut self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AgendaError::EmptyTitle);
        }
        self.title = title.to_string();

        if self.recurrence_category.is_none() {
            self.recurrence_rule = None;
        }
        if self.recurrence_rule.is_some() && self.start.is_none() {
            return Err(AgendaError::RuleWithoutStart);
        }
        Ok(())
    }
}
