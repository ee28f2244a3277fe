//! Count history timeline.
//!
//! This module provides:
//! - Minutes-to-pixels layout with floor-bounded span and minute ticks
//! - A small typed scene graph and its SVG serialization
//! - Icon sources with graceful fallback for missing artwork
//! - The renderer that ties intervals, colors, markers and legend together

mod geometry;
mod icons;
mod render;
mod scene;
mod svg;

pub use geometry::{span_for, Tick, TimelineGeometry, MAJOR_TICK_EVERY, MAX_TICKS};
pub use icons::{badge_for, png_data_uri, BadgeStyle, DirectoryIcons, IconKind, IconSource, NoIcons};
pub use render::{
    Placeholder, PlaceholderAction, RenderedTimeline, TimelineConfig, TimelineRenderer,
    TimelineSummary, TimelineView,
};
pub use scene::{Anchor, Circle, Image, Line, Paint, Rect, Scene, Shape, Stroke, Text};
pub use svg::{escape, to_svg};
