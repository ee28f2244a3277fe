//! Farming counters and change detection.
//!
//! The user edits four counters freely (up or down). Each observation is
//! compared against the previously observed values; only an increase of the
//! combined total produces a [`ChangeEvent`] for the interval log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four things counted during a farming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKind {
    /// Fragment worth 45/99 of a core.
    Frag45,
    /// Fragment worth 75/99 of a core.
    Frag75,
    /// A full core drop.
    Core,
    /// Party wipe, a lap with no drop.
    Wipe,
}

impl CounterKind {
    /// Canonical order. Change detection walks kinds in this order.
    pub const ALL: [CounterKind; 4] = [Self::Frag45, Self::Frag75, Self::Core, Self::Wipe];

    pub fn label(self) -> &'static str {
        match self {
            Self::Frag45 => "45",
            Self::Frag75 => "75",
            Self::Core => "core",
            Self::Wipe => "wipe",
        }
    }

    /// Both fragment kinds share an icon and differ only by badge.
    pub fn is_fragment(self) -> bool {
        matches!(self, Self::Frag45 | Self::Frag75)
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CounterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "45" | "frag45" | "frag_45" => Ok(Self::Frag45),
            "75" | "frag75" | "frag_75" => Ok(Self::Frag75),
            "core" => Ok(Self::Core),
            "wipe" | "wipes" => Ok(Self::Wipe),
            other => Err(format!("unknown counter kind: {other}")),
        }
    }
}

/// Current values of the four counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    #[serde(default)]
    pub frag_45: u32,
    #[serde(default)]
    pub frag_75: u32,
    #[serde(default)]
    pub core: u32,
    #[serde(default)]
    pub wipes: u32,
}

impl Counts {
    pub fn new(frag_45: u32, frag_75: u32, core: u32, wipes: u32) -> Self {
        Self {
            frag_45,
            frag_75,
            core,
            wipes,
        }
    }

    pub fn get(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::Frag45 => self.frag_45,
            CounterKind::Frag75 => self.frag_75,
            CounterKind::Core => self.core,
            CounterKind::Wipe => self.wipes,
        }
    }

    pub fn set(&mut self, kind: CounterKind, value: u32) {
        match kind {
            CounterKind::Frag45 => self.frag_45 = value,
            CounterKind::Frag75 => self.frag_75 = value,
            CounterKind::Core => self.core = value,
            CounterKind::Wipe => self.wipes = value,
        }
    }

    /// Add `delta` to one counter, saturating at zero.
    pub fn adjust(&mut self, kind: CounterKind, delta: i64) {
        let next = (self.get(kind) as i64).saturating_add(delta).clamp(0, u32::MAX as i64);
        self.set(kind, next as u32);
    }

    /// Number of laps run: every counter is one lap.
    pub fn total(&self) -> u64 {
        CounterKind::ALL.iter().map(|k| self.get(*k) as u64).sum()
    }
}

/// A detected increase, ready to append to the interval log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub at: DateTime<Utc>,
    pub kind: CounterKind,
    pub total: u64,
}

/// Compare two observations.
///
/// Returns an event only when the total strictly increased. The kind is the
/// last kind (in [`CounterKind::ALL`] order) whose value differs, so when
/// several counters moved in one observation the later kind wins.
pub fn diff(previous: &Counts, current: &Counts, at: DateTime<Utc>) -> Option<ChangeEvent> {
    let total = current.total();
    if total <= previous.total() {
        return None;
    }
    let kind = CounterKind::ALL
        .iter()
        .copied()
        .filter(|k| previous.get(*k) != current.get(*k))
        .last()?;
    Some(ChangeEvent { at, kind, total })
}

/// Last observed counter values.
///
/// The baseline follows every observation, including decreases, so an
/// undo followed by a redo logs the redo again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    baseline: Counts,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn baseline(&self) -> &Counts {
        &self.baseline
    }

    /// Diff `current` against the baseline, then move the baseline to `current`.
    pub fn observe(&mut self, current: &Counts, at: DateTime<Utc>) -> Option<ChangeEvent> {
        let change = diff(&self.baseline, current, at);
        self.baseline = *current;
        change
    }

    pub fn reset(&mut self) {
        self.baseline = Counts::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn first_increase_is_reported() {
        let mut state = CounterState::new();
        let ev = state.observe(&Counts::new(1, 0, 0, 0), at()).unwrap();
        assert_eq!(ev.kind, CounterKind::Frag45);
        assert_eq!(ev.total, 1);
    }

    #[test]
    fn unchanged_observation_is_silent() {
        let mut state = CounterState::new();
        state.observe(&Counts::new(1, 0, 0, 0), at());
        assert!(state.observe(&Counts::new(1, 0, 0, 0), at()).is_none());
        let ev = state.observe(&Counts::new(1, 1, 0, 0), at()).unwrap();
        assert_eq!(ev.kind, CounterKind::Frag75);
        assert_eq!(ev.total, 2);
    }

    #[test]
    fn decrease_is_silent_and_tracked() {
        let mut state = CounterState::new();
        state.observe(&Counts::new(1, 1, 0, 0), at());
        assert!(state.observe(&Counts::new(1, 0, 0, 0), at()).is_none());
        assert_eq!(state.baseline(), &Counts::new(1, 0, 0, 0));

        let ev = state.observe(&Counts::new(1, 1, 0, 0), at()).unwrap();
        assert_eq!(ev.kind, CounterKind::Frag75);
        assert_eq!(ev.total, 2);
    }

    #[test]
    fn simultaneous_changes_last_kind_wins() {
        let prev = Counts::new(0, 0, 0, 0);
        let cur = Counts::new(1, 0, 1, 0);
        assert_eq!(diff(&prev, &cur, at()).unwrap().kind, CounterKind::Core);

        // A decrease in a later kind still wins when the total went up.
        let prev = Counts::new(0, 0, 0, 2);
        let cur = Counts::new(3, 0, 0, 1);
        let ev = diff(&prev, &cur, at()).unwrap();
        assert_eq!(ev.kind, CounterKind::Wipe);
        assert_eq!(ev.total, 4);
    }

    #[test]
    fn reset_returns_baseline_to_zero() {
        let mut state = CounterState::new();
        state.observe(&Counts::new(2, 0, 1, 0), at());
        state.reset();
        assert_eq!(state.baseline(), &Counts::default());
        assert!(state.observe(&Counts::new(0, 0, 1, 0), at()).is_some());
    }

    #[test]
    fn adjust_saturates_at_zero() {
        let mut counts = Counts::default();
        counts.adjust(CounterKind::Core, -3);
        assert_eq!(counts.core, 0);
        counts.adjust(CounterKind::Core, 2);
        counts.adjust(CounterKind::Core, -1);
        assert_eq!(counts.core, 1);
    }

    #[test]
    fn kind_parsing() {
        assert_eq!("45".parse::<CounterKind>().unwrap(), CounterKind::Frag45);
        assert_eq!("Frag75".parse::<CounterKind>().unwrap(), CounterKind::Frag75);
        assert_eq!("wipes".parse::<CounterKind>().unwrap(), CounterKind::Wipe);
        assert!("gold".parse::<CounterKind>().is_err());
    }
}
