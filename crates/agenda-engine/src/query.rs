//! Calendar window queries -- merges single and recurring events into one
//! ordered occurrence list.
//!
//! Non-recurring events go through the [`overlaps`] test directly. Recurring
//! events pass a coarser pre-filter ([`is_recurrence_candidate`]) and are then
//! expanded by [`crate::expander::expand`], which resolves the exact instances.

use std::cmp::Ordering;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{AgendaError, Result};
use crate::event::{Event, Occurrence};
use crate::expander;

/// An inclusive `[start, end]` query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// # Errors
    /// Returns `AgendaError::InvalidWindow` if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(AgendaError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Fill in missing bounds: start defaults to `now`, end to start plus
    /// `config.default_horizon_months`.
    pub fn resolve(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let start = start.unwrap_or(now);
        let end = match end {
            Some(end) => end,
            None => start
                .checked_add_months(Months::new(config.default_horizon_months))
                .ok_or_else(|| {
                    AgendaError::Config(format!(
                        "default horizon of {} months overflows from {}",
                        config.default_horizon_months, start
                    ))
                })?,
        };
        Self::new(start, end)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Overlap test for a single (non-expanded) event.
///
/// True when the start or the end lies in the window, when the event spans the
/// whole window, or when the event has no start at all.
pub fn overlaps(event: &Event, window: &Window) -> bool {
    let Some(start) = event.start else {
        return true;
    };
    if window.contains(start) {
        return true;
    }
    match event.end {
        Some(end) => window.contains(end) || (start <= window.start && end >= window.end),
        None => false,
    }
}

/// Coarse pre-filter for recurring events: the series starts no later than the
/// window end and has not ended before the window start.
pub fn is_recurrence_candidate(event: &Event, window: &Window) -> bool {
    let Some(start) = event.start else {
        return false;
    };
    start <= window.end
        && event
            .recurrence_end_date
            .is_none_or(|until| until >= window.start)
}

/// All occurrences of `events` within `window`, ordered by start.
///
/// Unscheduled events (no start) sort first, ties break on event id, and
/// duplicate `(id, instance_key)` pairs are collapsed. Pure and deterministic.
pub fn query(events: &[Event], window: &Window, config: &EngineConfig) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = Vec::new();
    let mut recurring = 0usize;

    for event in events {
        if event.is_recurring() {
            recurring += 1;
            if is_recurrence_candidate(event, window) {
                occurrences.extend(expander::expand(event, window, config));
            }
        } else if overlaps(event, window) {
            occurrences.push(Occurrence::nominal(event));
        }
    }

    occurrences.sort_by(compare_occurrences);
    occurrences.dedup_by(|a, b| a.id == b.id && a.instance_key == b.instance_key);

    debug!(
        events = events.len(),
        recurring,
        occurrences = occurrences.len(),
        window_start = %window.start,
        window_end = %window.end,
        "calendar query evaluated"
    );

    occurrences
}

/// [`query`] with missing bounds resolved against the current time.
///
/// # Errors
/// Returns `AgendaError::InvalidWindow` if the resolved start is after the end.
pub fn query_now(
    events: &[Event],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    config: &EngineConfig,
) -> Result<Vec<Occurrence>> {
    let window = Window::resolve(start, end, Utc::now(), config)?;
    Ok(query(events, &window, config))
}

fn compare_occurrences(a: &Occurrence, b: &Occurrence) -> Ordering {
    // `None < Some(_)`, so unscheduled occurrences lead.
    a.occurrence_start
        .cmp(&b.occurrence_start)
        .then_with(|| a.id.cmp(&b.id))
}
