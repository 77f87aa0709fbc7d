//! Occurrence expansion -- turns one event into the concrete occurrences that
//! fall inside a query window.
//!
//! Recurring events are expanded through the `rrule` crate from the decoded
//! rule anchored at the event's start. A rule that fails to decode degrades to
//! the event's single nominal occurrence instead of failing the query.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::{debug, warn};

use crate::codec::{self, RecurrenceParams};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::event::{Event, Occurrence};
use crate::query::{overlaps, Window};

/// Expand `event` into its occurrences within `window`, in ascending order.
///
/// - Without a rule (or without a start to anchor one), the event is its own
///   single occurrence, included only if it overlaps the window.
/// - With a rule, every instance whose start lies in `[window.start, window.end]`
///   is generated, each lasting `event.end - event.start`.
/// - A malformed rule is logged and the nominal occurrence is used instead.
pub fn expand(event: &Event, window: &Window, config: &EngineConfig) -> Vec<Occurrence> {
    let (Some(rule), Some(anchor)) = (event.recurrence_rule.as_deref(), event.start) else {
        if event.recurrence_rule.is_some() {
            warn!(event_id = %event.id, "recurrence rule without a start; treating as a single event");
        }
        return nominal_if_overlapping(event, window);
    };

    match codec::decode(rule, anchor).and_then(|params| instance_starts(&params, window, config)) {
        Ok(starts) => starts
            .into_iter()
            .map(|start| Occurrence::instance(event, start))
            .collect(),
        Err(e) => {
            warn!(event_id = %event.id, rule, error = %e, "falling back to the nominal occurrence");
            nominal_if_overlapping(event, window)
        }
    }
}

/// Instance starts of a decoded rule that fall inside `window`, inclusive on both ends.
///
/// # Errors
/// Returns `AgendaError::MalformedRule` if the `rrule` crate rejects the rule.
pub fn instance_starts(
    params: &RecurrenceParams,
    window: &Window,
    config: &EngineConfig,
) -> Result<Vec<DateTime<Utc>>> {
    // UNTIL before the anchor: the series never produces an instance.
    if params.until.is_some_and(|until| until < params.anchor) {
        debug!("recurrence ends before its anchor; no instances");
        return Ok(Vec::new());
    }

    let upper = match params.until {
        Some(until) => until.min(window.end),
        None => window.end,
    };
    if upper < window.start || params.anchor > upper {
        return Ok(Vec::new());
    }

    let rrule_set = params.to_rrule_set()?;

    // `rrule` works in whole seconds; its dates get the anchor's sub-second
    // part added back so instances land on the event's exact start.
    let offset = params.anchor - params.anchor.trunc_subsecs(0);

    // `after`/`before` are exclusive; widen by a second and re-check below.
    let tz: rrule::Tz = Utc.into();
    let after = window
        .start
        .checked_sub_signed(Duration::seconds(1))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .with_timezone(&tz);
    let before = upper
        .checked_add_signed(Duration::seconds(1))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
        .with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(config.max_occurrences);
    if result.limited {
        warn!(
            limit = config.max_occurrences,
            rule = %params.to_rule_string(),
            "expansion truncated at the configured occurrence limit"
        );
    }

    let mut starts: Vec<DateTime<Utc>> = result
        .dates
        .into_iter()
        .filter_map(|dt| dt.with_timezone(&Utc).checked_add_signed(offset))
        .filter(|start| *start >= window.start && *start <= upper)
        .collect();
    starts.sort();
    starts.dedup();

    Ok(starts)
}

fn nominal_if_overlapping(event: &Event, window: &Window) -> Vec<Occurrence> {
    if overlaps(event, window) {
        vec![Occurrence::nominal(event)]
    } else {
        Vec::new()
    }
}
