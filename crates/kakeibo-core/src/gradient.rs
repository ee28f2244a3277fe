//! Latency color gradient for count intervals.
//!
//! Maps the length of an interval (minutes between two counts) onto a
//! six-stop severity scale:
//!
//! ```text
//! minutes   0 ─── 1 ─── 2 ─── 3 ─── 4 ─── 5 ───>
//! color   green  green  light amber orange red | deep red (fixed)
//! ```
//!
//! The first minute only travels the first 20% of the dark-to-light green
//! range so that very fast laps stay visibly "excellent".

use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear per-channel blend from `self` to `other`.
    ///
    /// `t` is clamped to `0.0..=1.0`; channels are truncated toward zero.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Rgb {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
        }
    }

    /// `#rrggbb`, lowercase.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    let (a, b) = (a as f64, b as f64);
    (a + (b - a) * t) as u8
}

/// green-600, "very good".
pub const GREEN_GOOD_DARK: Rgb = Rgb::new(0x16, 0xa3, 0x4a);
/// green-400, "fine".
pub const GREEN_OK_LIGHT: Rgb = Rgb::new(0x4a, 0xde, 0x80);
/// amber-500, "a bit slow".
pub const AMBER: Rgb = Rgb::new(0xf5, 0x9e, 0x0b);
/// orange-400, "something went wrong".
pub const ORANGE: Rgb = Rgb::new(0xfb, 0x92, 0x3c);
/// red-500, "very slow".
pub const RED: Rgb = Rgb::new(0xef, 0x44, 0x44);
/// red-900, "probably forgot to count".
pub const DEEP_RED: Rgb = Rgb::new(0x99, 0x1b, 0x1b);

/// Band boundary colors, one per whole position `0..=5`.
pub const GRADIENT_STOPS: [Rgb; 6] = [GREEN_GOOD_DARK, GREEN_OK_LIGHT, AMBER, ORANGE, RED, DEEP_RED];

/// Past this many minutes the color no longer interpolates.
pub const SATURATION_MINUTES: f64 = 5.0;

/// Share of the green range covered by the first minute.
const FIRST_MINUTE_SHARE: f64 = 0.2;

/// Position of a duration along [`GRADIENT_STOPS`].
///
/// Non-decreasing in `minutes`. Negative and NaN input count as zero.
/// Durations in `0..=5` map into `0.0..=4.0`; anything longer jumps to `5.0`.
pub fn position_for_duration(minutes: f64) -> f64 {
    let m = if minutes.is_nan() { 0.0 } else { minutes.max(0.0) };
    if m <= 1.0 {
        m * FIRST_MINUTE_SHARE
    } else if m <= 2.0 {
        FIRST_MINUTE_SHARE + (m - 1.0) * (1.0 - FIRST_MINUTE_SHARE)
    } else if m <= SATURATION_MINUTES {
        m - 1.0
    } else {
        (GRADIENT_STOPS.len() - 1) as f64
    }
}

/// Color for a position produced by [`position_for_duration`].
pub fn color_at_position(position: f64) -> Rgb {
    let last = GRADIENT_STOPS.len() - 1;
    if position > (last - 1) as f64 {
        return GRADIENT_STOPS[last];
    }
    let p = position.max(0.0);
    let band = (p.floor() as usize).min(last - 2);
    GRADIENT_STOPS[band].lerp(GRADIENT_STOPS[band + 1], p - band as f64)
}

/// Interval color for a duration in minutes.
pub fn color_for_duration(minutes: f64) -> Rgb {
    color_at_position(position_for_duration(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_colors() {
        assert_eq!(color_for_duration(0.0).to_hex(), "#16a34a");
        assert_eq!(color_for_duration(2.0), GREEN_OK_LIGHT);
        assert_eq!(color_for_duration(3.0), AMBER);
        assert_eq!(color_for_duration(4.0), ORANGE);
        assert_eq!(color_for_duration(5.0), RED);
        assert_eq!(color_for_duration(6.0).to_hex(), "#991b1b");
        assert_eq!(color_for_duration(500.0), DEEP_RED);
    }

    #[test]
    fn first_minute_only_reaches_a_fifth_of_the_green_range() {
        assert_eq!(color_for_duration(1.0).to_hex(), "#20ae54");
    }

    #[test]
    fn mid_band_interpolation() {
        assert_eq!(color_for_duration(2.5).to_hex(), "#9fbe45");
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(color_for_duration(-3.0), color_for_duration(0.0));
        assert_eq!(color_for_duration(f64::NAN), color_for_duration(0.0));
        assert_eq!(color_for_duration(f64::INFINITY), DEEP_RED);
    }

    #[test]
    fn second_band_continues_from_first() {
        let just_before = position_for_duration(1.0);
        let just_after = position_for_duration(1.0 + 1e-9);
        assert!(just_after >= just_before);
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(GREEN_GOOD_DARK.lerp(RED, -1.0), GREEN_GOOD_DARK);
        assert_eq!(GREEN_GOOD_DARK.lerp(RED, 2.0), RED);
    }

    #[test]
    fn display_matches_hex() {
        assert_eq!(AMBER.to_string(), AMBER.to_hex());
    }
}
