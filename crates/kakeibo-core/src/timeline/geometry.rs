//! Minutes-to-pixels mapping for the timeline canvas.

use serde::Serialize;

use crate::interval_log::Interval;

/// Every n-th tick is major (taller and labeled).
pub const MAJOR_TICK_EVERY: u64 = 5;
/// Upper bound on ticks per axis, one per canvas unit at the default width.
pub const MAX_TICKS: u64 = 2000;
/// Tick steps in minutes, tried in order until the axis fits in [`MAX_TICKS`].
const TICK_STEPS: [u64; 9] = [1, 5, 10, 30, 60, 360, 1440, 10_080, 43_200];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub minute: u64,
    pub x: f64,
    pub major: bool,
}

/// Horizontal layout of one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineGeometry {
    /// Minutes covered by the drawable width. Never below the configured minimum.
    pub span_min: f64,
    pub width: f64,
    pub pad_left: f64,
    pub pad_right: f64,
}

impl TimelineGeometry {
    pub fn new(span_min: f64, width: f64, pad_left: f64, pad_right: f64) -> Self {
        Self {
            span_min,
            width,
            pad_left,
            pad_right,
        }
    }

    /// Layout for `intervals`, with the span floored at `min_span_min`.
    pub fn for_intervals(
        intervals: &[Interval],
        min_span_min: f64,
        width: f64,
        pad_left: f64,
        pad_right: f64,
    ) -> Self {
        Self::new(span_for(intervals, min_span_min), width, pad_left, pad_right)
    }

    pub fn drawable_width(&self) -> f64 {
        (self.width - self.pad_left - self.pad_right).max(0.0)
    }

    /// Affine, monotonic map from minutes to x.
    pub fn x_for(&self, minutes: f64) -> f64 {
        self.pad_left + self.drawable_width() * (minutes / self.span_min)
    }

    /// Minutes between adjacent ticks: one minute while the axis fits in
    /// [`MAX_TICKS`], otherwise the first coarser step that does.
    pub fn tick_step(&self) -> u64 {
        let span = self.last_minute();
        TICK_STEPS
            .iter()
            .copied()
            .find(|step| span / step < MAX_TICKS)
            .unwrap_or_else(|| span / (MAX_TICKS - 1) + 1)
    }

    /// Ticks from 0 through `ceil(span)`, every [`tick_step`](Self::tick_step)
    /// minutes. Every [`MAJOR_TICK_EVERY`]-th tick is major.
    pub fn ticks(&self) -> Vec<Tick> {
        let step = self.tick_step();
        let last = self.last_minute();
        (0..=last / step)
            .map(|i| {
                let minute = i * step;
                Tick {
                    minute,
                    x: self.x_for(minute as f64),
                    major: i % MAJOR_TICK_EVERY == 0,
                }
            })
            .collect()
    }

    fn last_minute(&self) -> u64 {
        if self.span_min.is_finite() {
            self.span_min.ceil().max(0.0) as u64
        } else {
            0
        }
    }
}

/// `max(min_span, end of the last interval)`.
///
/// Non-finite or non-positive minimums fall back to one minute so the
/// mapping never divides by zero.
pub fn span_for(intervals: &[Interval], min_span_min: f64) -> f64 {
    let floor = if min_span_min.is_finite() && min_span_min > 0.0 {
        min_span_min
    } else {
        1.0
    };
    let end = intervals
        .last()
        .map(Interval::end_min)
        .filter(|e| e.is_finite())
        .unwrap_or(0.0);
    floor.max(end)
}
