//! Pixel ⇄ normalized coordinate mapping for the drawable plot region.
//!
//! The host supplies the widget size and a symmetric inset; everything
//! inside the inset is the drawable region. Normalized space is
//! `[0, 1] × [0, 1]` with Y pointing up, pixel space has Y pointing down:
//!
//! ```text
//! nx = clamp((px − left) / (right − left), 0, 1)
//! ny = clamp((bottom − py) / (bottom − top), 0, 1)
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Convert density-independent units to pixels, rounding to the nearest pixel edge.
pub fn dp_to_px(dp: f32, density: f32) -> f32 {
    dp * density + 0.5
}

/// Host-supplied layout of the curve plot.
///
/// Must stay stable for the duration of one edit session; the editor
/// defers relayouts that arrive mid-drag.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotBounds {
    /// Widget width in pixels.
    pub width: f32,
    /// Widget height in pixels.
    pub height: f32,
    /// Inset applied on all four sides, in pixels.
    pub inset: f32,
}

impl PlotBounds {
    pub const fn new(width: f32, height: f32, inset: f32) -> Self {
        Self {
            width,
            height,
            inset,
        }
    }

    pub fn left(&self) -> f32 {
        self.inset
    }

    pub fn right(&self) -> f32 {
        self.width - self.inset
    }

    pub fn top(&self) -> f32 {
        self.inset
    }

    pub fn bottom(&self) -> f32 {
        self.height - self.inset
    }

    /// Drawable span on each axis (`right − left`, `bottom − top`).
    pub fn span(&self) -> Vec2 {
        Vec2::new(self.right() - self.left(), self.bottom() - self.top())
    }

    /// True when the drawable region has no area (e.g. before first layout).
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        span.x <= 0.0 || span.y <= 0.0
    }

    /// Default position of a channel's first point.
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.bottom())
    }

    /// Default position of a channel's last point.
    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    /// Map a pixel position into normalized space, clamped to `[0, 1]`.
    pub fn normalize(&self, px: Vec2) -> Vec2 {
        let span = self.span();
        Vec2::new(
            unit_fraction(px.x - self.left(), span.x),
            unit_fraction(self.bottom() - px.y, span.y),
        )
    }

    /// Map a normalized position back into pixel space.
    ///
    /// Not clamped: spline samples slightly outside the unit square map
    /// slightly outside the drawable region.
    pub fn denormalize(&self, n: Vec2) -> Vec2 {
        let span = self.span();
        Vec2::new(self.left() + n.x * span.x, self.bottom() - n.y * span.y)
    }

    /// Clamp a pixel position into the drawable region.
    pub fn clamp(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            clamp_ordered(px.x, self.left(), self.right()),
            self.clamp_y(px.y),
        )
    }

    /// Clamp a pixel y coordinate into the drawable vertical extent.
    pub fn clamp_y(&self, y: f32) -> f32 {
        clamp_ordered(y, self.top(), self.bottom())
    }
}

fn unit_fraction(offset: f32, span: f32) -> f32 {
    if span > 0.0 {
        (offset / span).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// `f32::clamp` that tolerates `min > max` (collapsed bounds) instead of panicking.
pub(crate) fn clamp_ordered(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
