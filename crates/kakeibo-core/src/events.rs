use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::CounterKind;

/// Every state change of a counting session produces an Event.
/// Hosts show them as flash messages; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The start sentinel was seeded; the timeline clock is running.
    CountingStarted { at: DateTime<Utc> },
    /// A counter increase was appended to the interval log.
    CountRecorded {
        kind: CounterKind,
        total: u64,
        at: DateTime<Utc>,
    },
    /// Counters, baselines and the interval log were cleared.
    CountsReset { message: String, at: DateTime<Utc> },
    /// A ledger row was stored.
    RecordAdded {
        id: String,
        username: String,
        profit: i64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::CountingStarted { at }
            | Self::CountRecorded { at, .. }
            | Self::CountsReset { at, .. }
            | Self::RecordAdded { at, .. } => *at,
        }
    }

    /// Short human-readable confirmation.
    pub fn message(&self) -> String {
        match self {
            Self::CountingStarted { .. } => "Counting started".to_string(),
            Self::CountRecorded { kind, total, .. } => format!("Recorded {kind} (lap {total})"),
            Self::CountsReset { message, .. } => message.clone(),
            Self::RecordAdded { profit, .. } => format!("Record added ({profit} G)"),
        }
    }
}
