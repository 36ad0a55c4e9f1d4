//! Control-point storage for the four channels.
//!
//! Points are kept in pixel space against the current [`PlotBounds`].
//! After every mutation a channel holds between [`MIN_POINTS`] and
//! [`MAX_POINTS`] points once seeded, sorted by x, with the first and
//! last point pinned to the left and right bound.
//!
//! Mutations never fail: out-of-range selections and full channels turn
//! the call into a no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::geometry::{PlotBounds, clamp_ordered};

/// Hard cap on control points per channel.
pub const MAX_POINTS: usize = 12;
/// A channel with fewer points is re-seeded before it can be edited.
pub const MIN_POINTS: usize = 2;

/// Ordered control points of one channel, in pixel space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelState {
    points: Vec<Vec2>,
}

impl ChannelState {
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `index` is the first or last point.
    pub fn is_edge(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    /// Points mapped into normalized space.
    pub fn normalized(&self, bounds: &PlotBounds) -> Vec<Vec2> {
        self.points.iter().map(|p| bounds.normalize(*p)).collect()
    }

    fn seed(&mut self, bounds: &PlotBounds) {
        self.points.clear();
        self.points.push(bounds.bottom_left());
        self.points.push(bounds.top_right());
    }

    /// Seed the default endpoints if the channel is undersized. Returns `true` if it did.
    fn ensure_seeded(&mut self, bounds: &PlotBounds) -> bool {
        if self.points.len() >= MIN_POINTS {
            return false;
        }
        self.seed(bounds);
        true
    }

    /// Replace the points with host-supplied data, repairing ordering and bounds.
    fn replace(&mut self, mut points: Vec<Vec2>, bounds: &PlotBounds) {
        sanitize(&mut points);
        for p in &mut points {
            *p = bounds.clamp(*p);
        }
        if points.len() >= MIN_POINTS {
            let last = points.len() - 1;
            points[0].x = bounds.left();
            points[last].x = bounds.right();
        }
        self.points = points;
    }

    fn rescale(&mut self, from: &PlotBounds, to: &PlotBounds) {
        for p in &mut self.points {
            *p = to.denormalize(from.normalize(*p));
        }
    }
}

/// Drop non-finite points, sort by x and cap at [`MAX_POINTS`] keeping the last point.
fn sanitize(points: &mut Vec<Vec2>) {
    points.retain(|p| p.is_finite());
    if points.windows(2).any(|w| w[1].x < w[0].x) {
        tracing::warn!("unsorted control points supplied, sorting by x");
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    if points.len() > MAX_POINTS {
        tracing::warn!(
            "{} control points supplied, keeping {MAX_POINTS}",
            points.len()
        );
        let last = points[points.len() - 1];
        points.truncate(MAX_POINTS - 1);
        points.push(last);
    }
}

/// The four channel point lists plus the active channel and selection.
///
/// Pixel points always live in the last layout that had an area. A
/// zero-area layout leaves them untouched, and normalized data supplied
/// before the first real layout waits in `pending` until one arrives.
#[derive(Debug, Clone)]
pub struct CurveStore {
    channels: [ChannelState; 4],
    pending: [Option<Vec<Vec2>>; 4],
    active: Channel,
    selected: Option<usize>,
    bounds: PlotBounds,
    /// Last bounds with an area; the space `channels` is expressed in.
    frame: Option<PlotBounds>,
    hit_radius: f32,
}

impl CurveStore {
    /// Create a store with empty channels; `Combined` is active and seeded
    /// as soon as the bounds have an area.
    pub fn new(bounds: PlotBounds, hit_radius: f32) -> Self {
        let mut store = Self {
            channels: Default::default(),
            pending: Default::default(),
            active: Channel::Combined,
            selected: None,
            bounds,
            frame: (!bounds.is_degenerate()).then_some(bounds),
            hit_radius,
        };
        store.ensure_active_seeded();
        store
    }

    pub fn bounds(&self) -> PlotBounds {
        self.bounds
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }

    /// Apply new layout bounds, carrying every channel's shape over.
    ///
    /// A zero-area layout keeps the points as they are; the next layout
    /// with an area rescales them from the last real one.
    pub fn set_bounds(&mut self, bounds: PlotBounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        if bounds.is_degenerate() {
            tracing::debug!("plot bounds {}x{} have no area", bounds.width, bounds.height);
            return;
        }

        match self.frame {
            Some(from) => {
                for channel in &mut self.channels {
                    channel.rescale(&from, &bounds);
                }
            }
            None => {
                for (channel, pending) in self.channels.iter_mut().zip(&mut self.pending) {
                    let points = match pending.take() {
                        Some(normalized) => {
                            normalized.iter().map(|n| bounds.denormalize(*n)).collect()
                        }
                        None => std::mem::take(&mut channel.points),
                    };
                    channel.replace(points, &bounds);
                }
            }
        }
        tracing::info!(
            "plot bounds {}x{} (inset {})",
            bounds.width,
            bounds.height,
            bounds.inset
        );
        self.frame = Some(bounds);
        self.ensure_active_seeded();
    }

    pub fn active_channel(&self) -> Channel {
        self.active
    }

    /// Switch the editing target. The selection is cleared and the target
    /// is seeded with the default endpoints if it has fewer than two points.
    pub fn set_active_channel(&mut self, channel: Channel) {
        if channel != self.active {
            tracing::debug!("active channel {} -> {}", self.active, channel);
        }
        self.active = channel;
        self.selected = None;
        self.ensure_active_seeded();
    }

    /// Seed the active channel if it is undersized and the bounds allow it.
    pub fn ensure_active_seeded(&mut self) {
        if self.bounds.is_degenerate() {
            return;
        }
        let active = self.active;
        if self.channels[active.index()].ensure_seeded(&self.bounds) {
            tracing::info!("seeded default endpoints for {active}");
            self.selected = None;
        }
    }

    pub fn channel(&self, channel: Channel) -> &ChannelState {
        &self.channels[channel.index()]
    }

    /// Pixel-space points of a channel.
    pub fn points(&self, channel: Channel) -> &[Vec2] {
        self.channel(channel).points()
    }

    pub fn active_points(&self) -> &[Vec2] {
        self.points(self.active)
    }

    /// Normalized points of a channel. Before the first layout with an area
    /// this is whatever normalized data is waiting for one.
    pub fn normalized_points(&self, channel: Channel) -> Vec<Vec2> {
        match &self.frame {
            Some(frame) => self.channel(channel).normalized(frame),
            None => self.pending[channel.index()].clone().unwrap_or_default(),
        }
    }

    /// Bulk-replace a channel's pixel-space points.
    ///
    /// Input is sorted, capped at [`MAX_POINTS`], clamped into the drawable
    /// region, and its endpoints are pinned. An undersized active channel is
    /// re-seeded immediately; other channels are seeded when activated.
    /// Before the first layout with an area the points are only sorted and
    /// capped; clamping happens once that layout arrives.
    pub fn set_points(&mut self, channel: Channel, mut points: Vec<Vec2>) {
        let index = channel.index();
        self.pending[index] = None;
        match self.frame {
            Some(frame) => self.channels[index].replace(points, &frame),
            None => {
                sanitize(&mut points);
                self.channels[index].points = points;
            }
        }
        if channel == self.active {
            self.selected = None;
            self.ensure_active_seeded();
        }
    }

    /// Bulk-replace a channel from normalized `[0, 1]` points.
    pub fn set_normalized_points(&mut self, channel: Channel, points: &[Vec2]) {
        let clamped = points.iter().map(|n| n.clamp(Vec2::ZERO, Vec2::ONE));
        match self.frame {
            Some(frame) => {
                let pixels = clamped.map(|n| frame.denormalize(n)).collect();
                self.set_points(channel, pixels);
            }
            None => {
                let mut normalized: Vec<Vec2> = clamped.collect();
                sanitize(&mut normalized);
                if normalized.len() >= MIN_POINTS {
                    let last = normalized.len() - 1;
                    normalized[0].x = 0.0;
                    normalized[last].x = 1.0;
                }
                tracing::debug!(
                    "holding {} points for {channel} until layout",
                    normalized.len()
                );
                let index = channel.index();
                self.channels[index].points.clear();
                self.pending[index] = Some(normalized);
                if channel == self.active {
                    self.selected = None;
                }
            }
        }
    }

    /// Drop a channel back to its two default endpoints.
    pub fn reset_channel(&mut self, channel: Channel) {
        self.pending[channel.index()] = None;
        self.channels[channel.index()].points.clear();
        if channel == self.active {
            self.selected = None;
            self.ensure_active_seeded();
        }
    }

    /// Selected index into the active channel, if it is still valid.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected.filter(|&i| i < self.active_points().len())
    }

    pub fn selected_point(&self) -> Option<Vec2> {
        self.selected_index().map(|i| self.active_points()[i])
    }

    /// Select a point of the active channel. Out-of-range indices clear the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.active_points().len());
    }

    /// Whether the selection is the first or last point of the active channel.
    pub fn is_edge_selected(&self) -> bool {
        self.selected_index()
            .is_some_and(|i| self.channel(self.active).is_edge(i))
    }

    /// Index of the first active point within the hit radius of `point` on
    /// both axes independently (`|dx| ≤ r && |dy| ≤ r`).
    pub fn hit_test(&self, point: Vec2) -> Option<usize> {
        if self.bounds.is_degenerate() {
            return None;
        }
        let r = self.hit_radius;
        self.active_points().iter().position(|p| {
            let d = (*p - point).abs();
            d.x <= r && d.y <= r
        })
    }

    /// Insert a point into the first gap that leaves at least the hit radius
    /// to both neighbours. Returns the new index, or `None` when no gap
    /// qualifies or the channel is full.
    pub fn insert_if_in_gap(&mut self, point: Vec2) -> Option<usize> {
        if self.bounds.is_degenerate() {
            return None;
        }
        let r = self.hit_radius;
        let y = self.bounds.clamp_y(point.y);
        let points = &mut self.channels[self.active.index()].points;
        if points.len() >= MAX_POINTS {
            return None;
        }
        let gap = points
            .windows(2)
            .position(|w| point.x > w[0].x + r && point.x < w[1].x - r)?;
        let index = gap + 1;
        points.insert(index, Vec2::new(point.x, y));
        tracing::debug!("inserted point {index} on {}", self.active);
        Some(index)
    }

    /// Move the selected point to `target`, clamped to the drawable region.
    ///
    /// Endpoints keep their pinned x. Interior points stay at least the hit
    /// radius away from both neighbours; if the neighbours are too close for
    /// that, the point sits at their midpoint. Returns the written position.
    pub fn move_selected(&mut self, target: Vec2) -> Option<Vec2> {
        if self.bounds.is_degenerate() {
            return None;
        }
        let index = self.selected_index()?;
        let bounds = self.bounds;
        let r = self.hit_radius;
        let points = &mut self.channels[self.active.index()].points;
        let last = points.len() - 1;

        let mut p = bounds.clamp(target);
        if index == 0 {
            p.x = bounds.left();
        } else if index == last {
            p.x = bounds.right();
        } else {
            let (left, right) = (points[index - 1].x, points[index + 1].x);
            let (lo, hi) = (left + r, right - r);
            p.x = if lo <= hi {
                clamp_ordered(p.x, lo, hi)
            } else {
                0.5 * (left + right)
            };
        }
        points[index] = p;
        Some(p)
    }
}
