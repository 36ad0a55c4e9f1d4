//! Catmull-Rom sampling of a channel's control points into a dense polyline.
//!
//! Each axis is interpolated independently over consecutive windows of four
//! points (P0, P1, P2, P3), producing the segment from P1 to P2:
//! ```text
//! q(t) = 0.5 × ((2×P1) + (-P0 + P2)×t + (2×P0 - 5×P1 + 4×P2 - P3)×t² + (-P0 + 3×P1 - 3×P2 + P3)×t³)
//! ```
//!
//! The sequence is padded with two ghost points just outside `[0, 1]` that
//! repeat the first and last y, so the real endpoints get stable tangents.
//!
//! Because x and y are interpolated separately, the x coordinate of the
//! output is not monotonic when neighbouring points are close together and
//! steep. Consumers that need a function table must handle that (see
//! [`crate::lut::bake_lut`]).

use glam::Vec2;

/// Sub-steps per segment; `STEP_COUNT - 1` interpolated samples plus one anchor.
pub const STEP_COUNT: usize = 10;
/// x of the ghost point prepended before the first control point.
pub const GHOST_LEFT_X: f32 = -0.001;
/// x of the ghost point appended after the last control point.
pub const GHOST_RIGHT_X: f32 = 1.001;

/// Sample normalized, x-sorted control points into a smooth polyline.
///
/// The output starts with the first control point, then for every segment
/// emits nine clamped interpolated samples followed by the segment's end
/// point verbatim, so every control point appears exactly in the output.
///
/// Returns an empty polyline for fewer than two points.
pub fn sample_curve(points: &[Vec2]) -> Vec<Vec2> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() < 2 {
        return Vec::new();
    }

    let mut extended = Vec::with_capacity(points.len() + 2);
    extended.push(Vec2::new(GHOST_LEFT_X, first.y));
    extended.extend_from_slice(points);
    extended.push(Vec2::new(GHOST_RIGHT_X, last.y));

    let mut samples = Vec::with_capacity(sample_count(points.len()));
    samples.push(first);
    for window in extended.windows(4) {
        let (p0, p1, p2, p3) = (window[0], window[1], window[2], window[3]);
        for step in 1..STEP_COUNT {
            let t = step as f32 / STEP_COUNT as f32;
            let x = catmull_rom(p0.x, p1.x, p2.x, p3.x, t);
            let y = catmull_rom(p0.y, p1.y, p2.y, p3.y, t);
            samples.push(Vec2::new(x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)));
        }
        samples.push(p2);
    }
    samples
}

/// Number of samples [`sample_curve`] produces for `point_count` control points.
pub const fn sample_count(point_count: usize) -> usize {
    if point_count < 2 {
        0
    } else {
        1 + (point_count - 1) * STEP_COUNT
    }
}

/// Catmull-Rom cubic interpolation between P1 and P2 (tension 0.5).
fn catmull_rom(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}
