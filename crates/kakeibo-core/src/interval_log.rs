//! Append-only log of count events and the intervals between them.
//!
//! The log stores raw [`CountEvent`]s. Intervals are derived on demand by
//! [`IntervalLog::snapshot`], which takes the current time so the last,
//! still-open interval grows on every call until the next count arrives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::counter::{ChangeEvent, CounterKind};
use crate::gradient::{color_for_duration, Rgb};

/// What a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Timeline origin, always at total zero.
    Start,
    Frag45,
    Frag75,
    Core,
    Wipe,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Frag45 => "45",
            Self::Frag75 => "75",
            Self::Core => "core",
            Self::Wipe => "wipe",
        }
    }

    pub fn counter(self) -> Option<CounterKind> {
        match self {
            Self::Start => None,
            Self::Frag45 => Some(CounterKind::Frag45),
            Self::Frag75 => Some(CounterKind::Frag75),
            Self::Core => Some(CounterKind::Core),
            Self::Wipe => Some(CounterKind::Wipe),
        }
    }
}

impl From<CounterKind> for EventKind {
    fn from(kind: CounterKind) -> Self {
        match kind {
            CounterKind::Frag45 => Self::Frag45,
            CounterKind::Frag75 => Self::Frag75,
            CounterKind::Core => Self::Core,
            CounterKind::Wipe => Self::Wipe,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("start") {
            return Ok(Self::Start);
        }
        s.parse::<CounterKind>().map(Self::from)
    }
}

/// One entry in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEvent {
    pub at: DateTime<Utc>,
    pub kind: EventKind,
    /// Sum of all four counters when the event was recorded.
    pub total: u64,
}

impl CountEvent {
    pub fn start(at: DateTime<Utc>) -> Self {
        Self {
            at,
            kind: EventKind::Start,
            total: 0,
        }
    }
}

impl From<ChangeEvent> for CountEvent {
    fn from(change: ChangeEvent) -> Self {
        Self {
            at: change.at,
            kind: change.kind.into(),
            total: change.total,
        }
    }
}

/// Loosely typed event as persisted or imported.
///
/// Everything is optional so a damaged entry can be dropped on its own
/// instead of failing the whole log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCountEvent {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub total: Option<i64>,
}

impl RawCountEvent {
    /// `None` when the timestamp or kind is missing or unparsable, or the
    /// total is negative. Only a start entry may omit its total; it is
    /// always zero.
    pub fn parse(&self) -> Option<CountEvent> {
        let at = DateTime::parse_from_rfc3339(self.ts.as_deref()?.trim())
            .ok()?
            .with_timezone(&Utc);
        let kind = self.kind.as_deref()?.parse::<EventKind>().ok()?;
        if kind == EventKind::Start {
            return Some(CountEvent::start(at));
        }
        let total = u64::try_from(self.total?).ok()?;
        Some(CountEvent { at, kind, total })
    }
}

impl From<CountEvent> for RawCountEvent {
    fn from(event: CountEvent) -> Self {
        Self {
            ts: Some(event.at.to_rfc3339()),
            kind: Some(event.kind.label().to_string()),
            total: Some(event.total as i64),
        }
    }
}

/// A derived segment of the timeline, starting at one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub at: DateTime<Utc>,
    pub kind: EventKind,
    pub total: u64,
    /// Minutes from the first event of the log.
    pub offset_min: f64,
    /// Minutes until the next event, or until "now" for the last one.
    pub duration_min: f64,
    /// True for the last interval, which ends at the snapshot time.
    pub open: bool,
}

impl Interval {
    pub fn end_min(&self) -> f64 {
        self.offset_min + self.duration_min
    }

    pub fn color(&self) -> Rgb {
        color_for_duration(self.duration_min)
    }
}

/// Ordered, append-only sequence of count events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RawCountEvent>", into = "Vec<RawCountEvent>")]
pub struct IntervalLog {
    events: Vec<CountEvent>,
}

impl IntervalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from persisted entries, dropping the malformed ones.
    pub fn from_raw(raw: Vec<RawCountEvent>) -> Self {
        let before = raw.len();
        let events: Vec<CountEvent> = raw.iter().filter_map(RawCountEvent::parse).collect();
        if events.len() < before {
            tracing::warn!(
                dropped = before - events.len(),
                kept = events.len(),
                "dropped malformed count events"
            );
        }
        Self { events }
    }

    pub fn events(&self) -> &[CountEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&CountEvent> {
        self.events.last()
    }

    /// Append an event. Returns whether it was stored.
    ///
    /// A start event is only stored into an empty log. Any other event is
    /// ignored when its total is below the previous event's total.
    pub fn append(&mut self, event: CountEvent) -> bool {
        if event.kind == EventKind::Start {
            if !self.events.is_empty() {
                tracing::debug!("ignoring start event on a running log");
                return false;
            }
            self.events.push(CountEvent::start(event.at));
            return true;
        }
        if let Some(prev) = self.events.last() {
            if event.total < prev.total {
                tracing::debug!(
                    total = event.total,
                    previous = prev.total,
                    "ignoring non-monotonic count event"
                );
                return false;
            }
        }
        self.events.push(event);
        true
    }

    /// Seed the start sentinel. No-op when the log already has events.
    pub fn seed_start(&mut self, at: DateTime<Utc>) -> bool {
        self.append(CountEvent::start(at))
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// Derive intervals as of `now`.
    ///
    /// The result always begins with a start entry (synthesized at the
    /// earliest timestamp if the log has none) and is ordered by time.
    /// Durations are never negative.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Vec<Interval> {
        if self.events.is_empty() {
            return Vec::new();
        }

        let mut events = self.events.clone();
        events.sort_by_key(|e| e.at);
        // Exactly one start, at the earliest timestamp. Starts stored later
        // (imported or persisted data) are dropped.
        let origin = CountEvent::start(events[0].at);
        events.retain(|e| e.kind != EventKind::Start);
        events.insert(0, origin);

        let t0 = events[0].at;
        let offsets: Vec<f64> = events.iter().map(|e| minutes_between(t0, e.at)).collect();
        let last = events.len() - 1;

        events
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let duration = if i < last {
                    offsets[i + 1] - offsets[i]
                } else {
                    minutes_between(e.at, now)
                };
                Interval {
                    at: e.at,
                    kind: e.kind,
                    total: e.total,
                    offset_min: offsets[i],
                    duration_min: duration.max(0.0),
                    open: i == last,
                }
            })
            .collect()
    }
}

impl From<Vec<RawCountEvent>> for IntervalLog {
    fn from(raw: Vec<RawCountEvent>) -> Self {
        Self::from_raw(raw)
    }
}

impl From<IntervalLog> for Vec<RawCountEvent> {
    fn from(log: IntervalLog) -> Self {
        log.events.into_iter().map(RawCountEvent::from).collect()
    }
}

/// Signed minutes from `from` to `to`.
pub(crate) fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
