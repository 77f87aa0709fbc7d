//! Error types for agenda-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgendaError {
    /// A stored recurrence rule could not be decoded.
    #[error("Malformed recurrence rule: {0}")]
    MalformedRule(String),

    /// A recurrence category with no rule mapping reached the strict encoder.
    #[error("Unrecognized recurrence category: {0}")]
    UnrecognizedCategory(String),

    #[error("Event title must not be empty")]
    EmptyTitle,

    #[error("A recurring event must have a start")]
    RuleWithoutStart,

    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AgendaError>;
