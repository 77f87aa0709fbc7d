//! # agenda-engine
//!
//! Recurrence rules and calendar window queries for event scheduling.
//!
//! Events carry a human-facing recurrence category ("weekly", "quarterly", ...)
//! that the codec turns into a canonical RFC 5545 RRULE. At read time the
//! query engine answers "which occurrences fall inside `[A, B]`?" by merging
//! single events with recurring ones expanded through the `rrule` crate.
//!
//! ## Modules
//!
//! - [`codec`] — recurrence category + end date ↔ RRULE string
//! - [`expander`] — one event → its occurrences within a window
//! - [`query`] — many events → one ordered occurrence list
//! - [`tags`] — free-text tag input → normalized tag set
//! - [`event`] — `Event` rows and projected `Occurrence`s
//! - [`patch`] — create/update payloads with three-state fields
//! - [`alert`] — alert offsets and working-day email alerts
//! - [`config`] — engine configuration
//! - [`error`] — Error types

pub mod alert;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod expander;
pub mod patch;
pub mod query;
pub mod tags;

pub use codec::{decode, encode, try_encode, Frequency, RecurrenceCategory, RecurrenceParams};
pub use config::EngineConfig;
pub use error::AgendaError;
pub use event::{Event, EventId, Occurrence};
pub use expander::expand;
pub use patch::{EventPatch, NewEvent, Patch};
pub use query::{query, query_now, Window};
pub use tags::parse_tags;
