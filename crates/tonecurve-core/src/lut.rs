//! 1D tone LUT baking from sampled curves, and per-pixel application.
//!
//! The spline sampler's polyline is not a function of x (see
//! [`crate::spline`]), so baking first reduces it to a monotone envelope:
//! any sample whose x does not advance past the largest x seen so far is
//! dropped. The envelope is then evaluated piecewise-linearly on a uniform
//! grid over `[0, 1]`.
//!
//! # Complexity
//! - Bake: O(S + size × log S) for S samples
//! - Apply: O(1) per component

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::spline::sample_curve;
use crate::store::CurveStore;

/// Table size used when the host does not pick one.
pub const DEFAULT_LUT_SIZE: usize = 256;

/// Tolerance used by [`ToneLut::is_identity`].
const IDENTITY_TOLERANCE: f32 = 1e-3;

/// Bake a sampled curve polyline into a `size`-entry lookup table over `[0, 1]`.
///
/// Inputs outside the sampled x range hold the first/last y. Fewer than two
/// usable samples produce an identity table.
pub fn bake_lut(samples: &[Vec2], size: usize) -> Vec<f32> {
    let envelope = monotone_envelope(samples);
    if envelope.len() < 2 {
        return identity_table(size);
    }

    (0..size)
        .map(|i| {
            let x = i as f32 / (size - 1).max(1) as f32;
            evaluate_envelope(&envelope, x)
        })
        .collect()
}

fn identity_table(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| i as f32 / (size - 1).max(1) as f32)
        .collect()
}

fn monotone_envelope(samples: &[Vec2]) -> Vec<Vec2> {
    let mut envelope: Vec<Vec2> = Vec::with_capacity(samples.len());
    for sample in samples {
        match envelope.last() {
            Some(last) if sample.x <= last.x => {}
            _ => envelope.push(*sample),
        }
    }
    envelope
}

/// Linear interpolation over a strictly increasing envelope (len ≥ 2).
fn evaluate_envelope(envelope: &[Vec2], x: f32) -> f32 {
    let first = envelope[0];
    let last = envelope[envelope.len() - 1];
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }

    // First sample with sample.x >= x; guaranteed in 1..len by the checks above.
    let hi = envelope.partition_point(|p| p.x < x);
    let (a, b) = (envelope[hi - 1], envelope[hi]);
    let t = (x - a.x) / (b.x - a.x);
    a.y + (b.y - a.y) * t
}

/// Lookup with linear interpolation between entries; input clamped to `[0, 1]`.
fn lookup(table: &[f32], v: f32) -> f32 {
    match table.len() {
        0 => return v,
        1 => return table[0],
        _ => {}
    }
    let pos = v.clamp(0.0, 1.0) * (table.len() - 1) as f32;
    let i = (pos.floor() as usize).min(table.len() - 2);
    let frac = pos - i as f32;
    table[i] + (table[i + 1] - table[i]) * frac
}

/// Baked tone curves for all four channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneLut {
    pub combined: Vec<f32>,
    pub red: Vec<f32>,
    pub green: Vec<f32>,
    pub blue: Vec<f32>,
}

impl ToneLut {
    pub fn identity(size: usize) -> Self {
        let table = identity_table(size);
        Self {
            combined: table.clone(),
            red: table.clone(),
            green: table.clone(),
            blue: table,
        }
    }

    /// Bake every channel of `store`. Channels that were never populated
    /// bake to identity.
    pub fn from_store(store: &CurveStore, size: usize) -> Self {
        let bake = |channel: Channel| {
            let points = store.normalized_points(channel);
            bake_lut(&sample_curve(&points), size)
        };
        Self {
            combined: bake(Channel::Combined),
            red: bake(Channel::Red),
            green: bake(Channel::Green),
            blue: bake(Channel::Blue),
        }
    }

    pub fn size(&self) -> usize {
        self.combined.len()
    }

    pub fn channel(&self, channel: Channel) -> &[f32] {
        match channel {
            Channel::Combined => &self.combined,
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Whether every table is within a small tolerance of `y = x`.
    pub fn is_identity(&self) -> bool {
        let identity = identity_table(self.size());
        Channel::ALL.iter().all(|c| {
            let table = self.channel(*c);
            table.len() == identity.len()
                && table
                    .iter()
                    .zip(&identity)
                    .all(|(a, b)| (a - b).abs() <= IDENTITY_TOLERANCE)
        })
    }

    /// Map an RGB triple through the combined curve, then each component's
    /// own channel curve.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let per_channel = [&self.red, &self.green, &self.blue];
        std::array::from_fn(|c| lookup(per_channel[c], lookup(&self.combined, rgb[c])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PlotBounds;

    const EPSILON: f32 = 1e-5;

    fn store() -> CurveStore {
        CurveStore::new(PlotBounds::new(220.0, 220.0, 10.0), 10.0)
    }

    #[test]
    fn test_bake_too_few_samples_is_identity() {
        let lut = bake_lut(&[], 256);
        assert_eq!(lut.len(), 256);
        assert!((lut[0] - 0.0).abs() < EPSILON);
        assert!((lut[255] - 1.0).abs() < EPSILON);
        assert!(bake_lut(&[Vec2::ONE], 0).is_empty());
    }

    #[test]
    fn test_bake_linear_segment() {
        let lut = bake_lut(&[Vec2::new(0.0, 0.2), Vec2::new(1.0, 0.6)], 5);
        let expected = [0.2, 0.3, 0.4, 0.5, 0.6];
        for (a, b) in lut.iter().zip(expected) {
            assert!((a - b).abs() < EPSILON, "{a} vs {b}");
        }
    }

    #[test]
    fn test_bake_holds_ends_outside_sampled_range() {
        let lut = bake_lut(&[Vec2::new(0.25, 0.1), Vec2::new(0.75, 0.9)], 5);
        assert!((lut[0] - 0.1).abs() < EPSILON);
        assert!((lut[4] - 0.9).abs() < EPSILON);
        assert!((lut[2] - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_envelope_drops_backtracking_samples() {
        let samples = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.6, 0.6),
            Vec2::new(0.4, 0.9),
            Vec2::new(1.0, 1.0),
        ];
        let envelope = monotone_envelope(&samples);
        assert_eq!(envelope, vec![samples[0], samples[1], samples[3]]);
        assert!(envelope.windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn test_default_store_bakes_to_identity() {
        let lut = ToneLut::from_store(&store(), DEFAULT_LUT_SIZE);
        assert_eq!(lut.size(), DEFAULT_LUT_SIZE);
        assert!(lut.is_identity());
    }

    #[test]
    fn test_flat_red_curve_only_affects_red() {
        let mut store = store();
        store.set_normalized_points(Channel::Red, &[Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.5)]);
        let lut = ToneLut::from_store(&store, DEFAULT_LUT_SIZE);
        assert!(!lut.is_identity());

        let out = lut.apply([0.2, 0.4, 0.6]);
        assert!((out[0] - 0.5).abs() < 1e-3);
        assert!((out[1] - 0.4).abs() < 1e-3);
        assert!((out[2] - 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_apply_clamps_input() {
        let lut = ToneLut::identity(16);
        assert_eq!(lut.apply([-1.0, 2.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_non_monotonic_curve_bakes_to_non_decreasing_lookup() {
        let points = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.2),
            Vec2::new(0.51, 0.8),
            Vec2::new(1.0, 1.0),
        ];
        let lut = bake_lut(&sample_curve(&points), 64);
        assert_eq!(lut.len(), 64);
        assert!(lut.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
    }
}
