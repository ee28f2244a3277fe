//! Counting session orchestration.
//!
//! A [`SessionContext`] holds everything one user's counting session owns:
//! the counters they edit, the change-detection baseline and the interval
//! log. [`SessionController`] is the only thing that mutates it, one pass
//! at a time:
//!
//! ```text
//! user edit -> observe -> append -> snapshot(now) -> render
//! ```
//!
//! Each pass samples the clock once and reuses that instant throughout.
//! Contexts are plain data; hosts keep one per user and persist it however
//! they like (the CLI stores it as JSON in the kv table).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

use crate::counter::{CounterKind, CounterState, Counts};
use crate::events::Event;
use crate::interval_log::{CountEvent, Interval, IntervalLog};
use crate::timeline::{IconSource, TimelineRenderer, TimelineSummary, TimelineView};

/// Source of "now".
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// State owned by one user's counting session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub counts: Counts,
    #[serde(default)]
    pub counter_state: CounterState,
    #[serde(default)]
    pub log: IntervalLog,
}

impl SessionContext {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }
}

/// Drives a [`SessionContext`] through observe/append/render passes.
#[derive(Debug)]
pub struct SessionController<C = SystemClock> {
    context: SessionContext,
    clock: C,
}

impl SessionController<SystemClock> {
    pub fn new(context: SessionContext) -> Self {
        Self::with_clock(context, SystemClock)
    }
}

impl<C: Clock> SessionController<C> {
    pub fn with_clock(context: SessionContext, clock: C) -> Self {
        Self { context, clock }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn into_context(self) -> SessionContext {
        self.context
    }

    pub fn counts(&self) -> &Counts {
        &self.context.counts
    }

    pub fn log(&self) -> &IntervalLog {
        &self.context.log
    }

    /// Add `delta` to one counter (negative to undo) and record the change.
    pub fn adjust(&mut self, kind: CounterKind, delta: i64) -> Option<Event> {
        self.context.counts.adjust(kind, delta);
        self.record_if_increased()
    }

    /// Replace all four counters and record the change.
    pub fn set_counts(&mut self, counts: Counts) -> Option<Event> {
        self.context.counts = counts;
        self.record_if_increased()
    }

    pub fn record_if_increased(&mut self) -> Option<Event> {
        let now = self.clock.now();
        self.record_if_increased_at(now)
    }

    /// Observe the current counters; append an event when the total went up.
    ///
    /// Calling this again with unchanged counters is a no-op.
    pub fn record_if_increased_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let ctx = &mut self.context;
        let Some(change) = ctx.counter_state.observe(&ctx.counts, now) else {
            tracing::debug!(total = ctx.counts.total(), "no count increase");
            return None;
        };
        if !ctx.log.append(CountEvent::from(change)) {
            return None;
        }
        tracing::info!(
            user = %ctx.username,
            kind = %change.kind,
            total = change.total,
            "count recorded"
        );
        Some(Event::CountRecorded {
            kind: change.kind,
            total: change.total,
            at: change.at,
        })
    }

    /// Seed the start sentinel. `None` when the log is already running.
    pub fn start(&mut self) -> Option<Event> {
        let now = self.clock.now();
        if !self.context.log.seed_start(now) {
            return None;
        }
        tracing::info!(user = %self.context.username, "counting started");
        Some(Event::CountingStarted { at: now })
    }

    /// Zero the counters and baselines and clear the log.
    pub fn reset(&mut self) -> Event {
        let ctx = &mut self.context;
        ctx.counts = Counts::default();
        ctx.counter_state.reset();
        ctx.log.reset();
        tracing::info!(user = %ctx.username, "counts and history cleared");
        Event::CountsReset {
            message: "Counts and history cleared".to_string(),
            at: self.clock.now(),
        }
    }

    pub fn snapshot(&self) -> Vec<Interval> {
        self.context.log.snapshot(self.clock.now())
    }

    /// Render the current log as of one sampled instant.
    pub fn render<I: IconSource>(&self, renderer: &TimelineRenderer<I>) -> TimelineView {
        renderer.render(&self.snapshot())
    }

    pub fn summary(&self, warn_minutes: f64) -> TimelineSummary {
        TimelineSummary::from_intervals(&self.snapshot(), warn_minutes)
    }

    /// Laps counted so far: the total at the last observation.
    pub fn laps(&self) -> u64 {
        self.context.counter_state.baseline().total()
    }

    /// One cell pack covers four laps.
    pub fn cycles(&self) -> u64 {
        self.laps().div_ceil(4)
    }
}
