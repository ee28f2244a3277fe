//! Count history timeline.
//!
//! Turns an interval snapshot into a [`Scene`]: a colored bar per interval,
//! a marker per event, a minute axis and a legend. Rendering is a pure
//! function of the intervals and the configuration, so it can run on every
//! UI refresh.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::TimelineGeometry;
use super::icons::{badge_for, IconKind, IconSource, NoIcons};
use super::scene::{Anchor, Circle, Image, Line, Paint, Rect, Scene, Shape, Stroke, Text};
use super::svg::to_svg;
use crate::gradient::Rgb;
use crate::interval_log::{EventKind, Interval};

const BAR_HEIGHT: f64 = 8.0;
const BAR_OPACITY: f64 = 0.45;
/// Minimum drawn bar width so zero-length intervals stay visible.
const MIN_BAR_WIDTH: f64 = 0.5;
const MARKER_SIZE: f64 = 5.0;
const ICON_SCALE: f64 = 6.0;
/// Extra room under the track for the axis labels.
const FOOTER_HEIGHT: f64 = 28.0;
const LEGEND_Y: f64 = 12.0;
const LEGEND_ICON: f64 = 14.0;
const LEGEND_STEP: f64 = 90.0;
const BADGE_FONT: &str = "system-ui, -apple-system, Segoe UI, Roboto, Helvetica Neue, Arial";

const TRACK: Rgb = Rgb::new(0x52, 0x52, 0x5b);
const PLATE: Rgb = Rgb::new(0x0b, 0x0f, 0x1a);
const FALLBACK: Rgb = Rgb::new(0x47, 0x55, 0x69);
const MAJOR_TICK: Rgb = Rgb::new(0xf3, 0xf4, 0xf6);
const MINOR_TICK: Rgb = Rgb::new(0x6b, 0x72, 0x80);
const TICK_LABEL: Rgb = Rgb::new(0xf9, 0xfa, 0xfb);
const AXIS_LABEL: Rgb = Rgb::new(0xe5, 0xe7, 0xeb);
const LEGEND_LABEL: Rgb = Rgb::new(0xd1, 0xd5, 0xdb);
const BLACK: Rgb = Rgb::new(0, 0, 0);

fn default_min_span() -> f64 {
    5.0
}
fn default_warn_minutes() -> f64 {
    5.0
}
fn default_width() -> f64 {
    2000.0
}
fn default_height() -> f64 {
    70.0
}
fn default_pad_left() -> f64 {
    48.0
}
fn default_pad_right() -> f64 {
    12.0
}

/// Canvas and scale settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// The axis never covers less than this many minutes.
    #[serde(default = "default_min_span")]
    pub min_span_min: f64,
    /// Intervals longer than this are counted as slow in the summary.
    /// Colors always follow the fixed gradient bands.
    #[serde(default = "default_warn_minutes")]
    pub warn_minutes: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_pad_left")]
    pub pad_left: f64,
    #[serde(default = "default_pad_right")]
    pub pad_right: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_span_min: default_min_span(),
            warn_minutes: default_warn_minutes(),
            width: default_width(),
            height: default_height(),
            pad_left: default_pad_left(),
            pad_right: default_pad_right(),
        }
    }
}

/// Scalar summaries shown under the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineSummary {
    /// Last event minus first event, in minutes.
    pub total_elapsed_min: f64,
    /// Mean gap between consecutive events; the open interval is excluded.
    pub mean_interval_min: f64,
    /// Closed intervals longer than the warn threshold.
    pub slow_intervals: usize,
    pub events: usize,
}

impl TimelineSummary {
    pub fn from_intervals(intervals: &[Interval], warn_minutes: f64) -> Self {
        let closed = &intervals[..intervals.len().saturating_sub(1)];
        let total_elapsed_min = match (intervals.first(), intervals.last()) {
            (Some(first), Some(last)) => (last.offset_min - first.offset_min).max(0.0),
            _ => 0.0,
        };
        let mean_interval_min = if closed.is_empty() {
            0.0
        } else {
            closed.iter().map(|i| i.duration_min).sum::<f64>() / closed.len() as f64
        };
        Self {
            total_elapsed_min,
            mean_interval_min,
            slow_intervals: closed.iter().filter(|i| i.duration_min > warn_minutes).count(),
            events: intervals.len(),
        }
    }

    pub fn elapsed_caption(&self) -> String {
        format!("Total elapsed: {:.1} min", self.total_elapsed_min)
    }

    pub fn mean_caption(&self) -> String {
        format!("Mean interval: {:.1} min/count", self.mean_interval_min)
    }
}

/// What the host should do when nothing has been counted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderAction {
    /// Seed the start sentinel so the clock begins running.
    SeedStart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub message: &'static str,
    pub action: PlaceholderAction,
    pub action_label: &'static str,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            message: "No count history yet.",
            action: PlaceholderAction::SeedStart,
            action_label: "Start counting",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTimeline {
    pub scene: Scene,
    pub geometry: TimelineGeometry,
    pub summary: TimelineSummary,
}

impl RenderedTimeline {
    pub fn svg(&self) -> String {
        to_svg(&self.scene)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineView {
    NotStarted(Placeholder),
    Drawn(RenderedTimeline),
}

impl TimelineView {
    pub fn rendered(&self) -> Option<&RenderedTimeline> {
        match self {
            Self::Drawn(r) => Some(r),
            Self::NotStarted(_) => None,
        }
    }
}

/// Lays out the timeline scene.
#[derive(Debug, Clone)]
pub struct TimelineRenderer<I = NoIcons> {
    config: TimelineConfig,
    icons: I,
    offset: FixedOffset,
}

impl TimelineRenderer<NoIcons> {
    pub fn new(config: TimelineConfig) -> Self {
        Self::with_icons(config, NoIcons)
    }
}

impl Default for TimelineRenderer<NoIcons> {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

impl<I: IconSource> TimelineRenderer<I> {
    pub fn with_icons(config: TimelineConfig, icons: I) -> Self {
        Self {
            config,
            icons,
            offset: utc(),
        }
    }

    /// Display tooltip times in this offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn render(&self, intervals: &[Interval]) -> TimelineView {
        if intervals.is_empty() {
            return TimelineView::NotStarted(Placeholder::default());
        }

        let c = &self.config;
        let geometry =
            TimelineGeometry::for_intervals(intervals, c.min_span_min, c.width, c.pad_left, c.pad_right);
        let track_y = c.height / 2.0;
        let mut scene = Scene::new(c.width, c.height + FOOTER_HEIGHT);

        scene.push(Rect::new(0.0, 0.0, scene.width, scene.height).fill(Paint::Css("transparent")));
        scene.push(Line {
            x1: c.pad_left,
            y1: track_y,
            x2: c.width - c.pad_right,
            y2: track_y,
            stroke: Stroke::new(TRACK, 1.0),
        });

        for interval in intervals {
            scene.push(self.bar(&geometry, interval, track_y));
        }
        for interval in intervals {
            let x = geometry.x_for(interval.offset_min);
            scene.push(self.marker(x, track_y, interval));
        }
        self.axis(&mut scene, &geometry, track_y);
        self.legend(&mut scene);

        TimelineView::Drawn(RenderedTimeline {
            scene,
            geometry,
            summary: TimelineSummary::from_intervals(intervals, c.warn_minutes),
        })
    }

    fn bar(&self, geometry: &TimelineGeometry, interval: &Interval, track_y: f64) -> Rect {
        let x0 = geometry.x_for(interval.offset_min);
        let x1 = geometry.x_for(interval.end_min().min(geometry.span_min));
        Rect::new(
            x0,
            track_y - BAR_HEIGHT / 2.0,
            (x1 - x0).max(MIN_BAR_WIDTH),
            BAR_HEIGHT,
        )
        .fill(interval.color())
        .opacity(BAR_OPACITY)
    }

    fn marker(&self, x: f64, y: f64, interval: &Interval) -> Shape {
        let size = MARKER_SIZE;
        let side = size * ICON_SCALE;
        let (x0, y0) = (x - side / 2.0, y - side / 2.0);

        let mut children: Vec<Shape> = vec![Rect::new(x0, y0, side, side)
            .rounded(size * 0.45)
            .fill(PLATE)
            .opacity(0.55)
            .into()];

        match IconKind::for_event(interval.kind).and_then(|k| self.icons.icon_uri(k)) {
            Some(href) => children.push(
                Image {
                    href,
                    x: x0,
                    y: y0,
                    width: side,
                    height: side,
                }
                .into(),
            ),
            None => children.push(
                Circle {
                    cx: x,
                    cy: y,
                    r: size * 1.1,
                    fill: FALLBACK.into(),
                }
                .into(),
            ),
        }

        if let Some(badge) = badge_for(interval.kind) {
            // Pill tucked into the plate's lower right corner.
            let r = size * 1.5;
            let bh = r * 1.05;
            let bw = r * 2.15;
            let bx = x0 + side - bw - r * 0.25;
            let by = y0 + side - bh - r * 0.20;
            let stroke_w = (size * 0.16).max(1.0);
            let (tx, ty, font) = (bx + bw / 2.0, by + bh * 0.70, bh * 0.80);

            children.push(
                Rect::new(bx + 1.2, by + 1.2, bw, bh)
                    .rounded(bh / 2.0)
                    .fill(BLACK)
                    .opacity(0.35)
                    .into(),
            );
            children.push(
                Rect::new(bx, by, bw, bh)
                    .rounded(bh / 2.0)
                    .fill(badge.background)
                    .stroke(Stroke::new(Paint::Css("rgba(255,255,255,0.35)"), stroke_w))
                    .into(),
            );
            children.push(
                Text::new(tx, ty, badge.label, font)
                    .anchor(Anchor::Middle)
                    .weight(900)
                    .fill(Paint::Css("none"))
                    .outline(Stroke::new(BLACK, (stroke_w * 0.9).max(0.8)))
                    .family(BADGE_FONT)
                    .into(),
            );
            children.push(
                Text::new(tx, ty, badge.label, font)
                    .anchor(Anchor::Middle)
                    .weight(900)
                    .fill(badge.foreground)
                    .family(BADGE_FONT)
                    .into(),
            );
        }

        Shape::Group {
            title: Some(self.tooltip(interval)),
            children,
        }
    }

    fn tooltip(&self, interval: &Interval) -> String {
        format!(
            "{} | +{:.1} min from start | total {} | kind: {}",
            interval.at.with_timezone(&self.offset).format("%H:%M:%S"),
            interval.offset_min,
            interval.total,
            interval.kind,
        )
    }

    fn axis(&self, scene: &mut Scene, geometry: &TimelineGeometry, track_y: f64) {
        let tick_top = track_y + BAR_HEIGHT + 10.0;
        let label_y = track_y + BAR_HEIGHT + 35.0;

        for tick in geometry.ticks() {
            let (len, width, color) = if tick.major {
                (12.0, 2.0, MAJOR_TICK)
            } else {
                (6.0, 1.2, MINOR_TICK)
            };
            scene.push(Line {
                x1: tick.x,
                y1: tick_top,
                x2: tick.x,
                y2: tick_top + len,
                stroke: Stroke::new(color, width),
            });
            if tick.major {
                scene.push(
                    Text::new(tick.x, label_y, tick.minute.to_string(), 18.0)
                        .fill(TICK_LABEL)
                        .weight(700)
                        .anchor(Anchor::Middle),
                );
            }
        }

        scene.push(
            Text::new(geometry.pad_left - 36.0, label_y, "min", 17.0)
                .fill(AXIS_LABEL)
                .weight(600),
        );
    }

    fn legend(&self, scene: &mut Scene) {
        const ENTRIES: [(EventKind, &str); 4] = [
            (EventKind::Frag45, "Frag 45"),
            (EventKind::Frag75, "Frag 75"),
            (EventKind::Core, "Core"),
            (EventKind::Wipe, "Wipe"),
        ];

        let mut x = self.config.pad_left;
        let icon_y = LEGEND_Y - 10.0;
        for (kind, label) in ENTRIES {
            match IconKind::for_event(kind).and_then(|k| self.icons.icon_uri(k)) {
                Some(href) => scene.push(Image {
                    href,
                    x,
                    y: icon_y,
                    width: LEGEND_ICON,
                    height: LEGEND_ICON,
                }),
                None => scene.push(
                    Rect::new(x, icon_y, LEGEND_ICON, LEGEND_ICON)
                        .rounded(3.0)
                        .fill(FALLBACK),
                ),
            }

            if let Some(badge) = badge_for(kind) {
                let r = 5.2;
                let bx = x + LEGEND_ICON - r * 0.6;
                let by = icon_y + LEGEND_ICON - r * 0.6;
                scene.push(Circle {
                    cx: bx,
                    cy: by,
                    r,
                    fill: badge.background.into(),
                });
                scene.push(
                    Text::new(bx, by + 1.6, badge.label, 7.0)
                        .anchor(Anchor::Middle)
                        .weight(700)
                        .fill(badge.foreground),
                );
            }

            scene.push(Text::new(x + 20.0, LEGEND_Y + 1.0, label, 12.0).fill(LEGEND_LABEL));
            x += LEGEND_STEP;
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}
