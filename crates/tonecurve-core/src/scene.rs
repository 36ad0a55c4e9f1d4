//! Render model for the curve plot.
//!
//! [`CurveScene`] is everything a renderer needs to paint one frame, in
//! pixel space and in paint order. Painting itself happens behind the
//! [`CurveRenderer`] trait so any backend (immediate-mode UI, SVG, GPU)
//! can consume the same scene.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, Rgba8, SELECTED_POINT_COLOR};
use crate::config::EditorConfig;
use crate::geometry::PlotBounds;
use crate::spline::sample_curve;
use crate::store::CurveStore;

/// Grid and border color.
pub const GRID_COLOR: Rgba8 = [0xFF, 0xFF, 0xFF, 0x80];
/// Identity diagonal color.
pub const DIAGONAL_COLOR: Rgba8 = [0xBA, 0xC8, 0xDC, 0x80];
/// Fill of the control point handles.
pub const HANDLE_COLOR: Rgba8 = [0xFF, 0xFF, 0xFF, 0xFF];
/// Grid cells per axis.
const GRID_DIVISIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
}

impl Line {
    pub const fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// One channel's sampled curve in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveLayer {
    pub channel: Channel,
    pub color: Rgba8,
    /// `true` for the channel under edit, `false` for reference curves.
    pub active: bool,
    pub polyline: Vec<Vec2>,
}

/// A filled circle (control point handle or selection dot).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgba8,
}

/// Backend that paints a [`CurveScene`].
pub trait CurveRenderer {
    fn draw_line(&mut self, line: Line, color: Rgba8, width: f32);

    fn draw_polyline(&mut self, points: &[Vec2], color: Rgba8, width: f32);

    fn fill_circle(&mut self, dot: Dot);
}

/// Everything drawn for one frame of the curve plot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveScene {
    pub bounds: PlotBounds,
    pub grid_width: f32,
    pub curve_width: f32,
    /// Border rectangle followed by the inner grid lines.
    pub grid: Vec<Line>,
    pub diagonal: Option<Line>,
    /// Active channel first, then the reference channels in channel order.
    pub layers: Vec<CurveLayer>,
    pub handles: Vec<Dot>,
    pub selection: Option<Dot>,
}

impl CurveScene {
    /// Build the scene for the store's current state. Empty when the bounds
    /// have no area yet.
    pub fn build(store: &CurveStore, config: &EditorConfig) -> Self {
        let bounds = store.bounds();
        let mut scene = Self {
            bounds,
            grid_width: config.grid_width_px(),
            curve_width: config.curve_width_px(),
            ..Self::default()
        };
        if bounds.is_degenerate() {
            return scene;
        }

        scene.grid = grid_lines(&bounds);
        scene.diagonal = Some(Line::new(bounds.bottom_left(), bounds.top_right()));

        let active = store.active_channel();
        let references = Channel::ALL.into_iter().filter(|c| *c != active);
        let order = std::iter::once(active).chain(references);
        for channel in order {
            let polyline: Vec<Vec2> = sample_curve(&store.normalized_points(channel))
                .into_iter()
                .map(|n| bounds.denormalize(n))
                .collect();
            if polyline.is_empty() {
                continue;
            }
            let is_active = channel == active;
            scene.layers.push(CurveLayer {
                channel,
                color: if is_active {
                    channel.color()
                } else {
                    channel.reference_color()
                },
                active: is_active,
                polyline,
            });
        }

        let radius = store.hit_radius() / 2.0;
        scene.handles = store
            .active_points()
            .iter()
            .map(|p| Dot {
                center: *p,
                radius,
                color: HANDLE_COLOR,
            })
            .collect();

        scene.selection = store.selected_point().map(|center| Dot {
            center,
            radius: (radius - config.select_stroke_px()).max(0.0),
            color: match active {
                Channel::Combined => SELECTED_POINT_COLOR,
                other => other.color(),
            },
        });
        scene
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.layers.is_empty()
    }

    pub fn active_layer(&self) -> Option<&CurveLayer> {
        self.layers.iter().find(|layer| layer.active)
    }

    /// Paint in order: grid, diagonal, active curve, reference curves,
    /// handles, selection.
    pub fn paint(&self, renderer: &mut dyn CurveRenderer) {
        for line in &self.grid {
            renderer.draw_line(*line, GRID_COLOR, self.grid_width);
        }
        if let Some(diagonal) = self.diagonal {
            renderer.draw_line(diagonal, DIAGONAL_COLOR, self.grid_width);
        }
        for layer in &self.layers {
            renderer.draw_polyline(&layer.polyline, layer.color, self.curve_width);
        }
        for handle in &self.handles {
            renderer.fill_circle(*handle);
        }
        if let Some(selection) = self.selection {
            renderer.fill_circle(selection);
        }
    }
}

fn grid_lines(bounds: &PlotBounds) -> Vec<Line> {
    let (l, r, t, b) = (
        bounds.left(),
        bounds.right(),
        bounds.top(),
        bounds.bottom(),
    );
    let mut lines = vec![
        Line::new(Vec2::new(l, t), Vec2::new(r, t)),
        Line::new(Vec2::new(r, t), Vec2::new(r, b)),
        Line::new(Vec2::new(r, b), Vec2::new(l, b)),
        Line::new(Vec2::new(l, b), Vec2::new(l, t)),
    ];
    let cell = bounds.span() / GRID_DIVISIONS as f32;
    for i in 1..GRID_DIVISIONS {
        let x = l + cell.x * i as f32;
        lines.push(Line::new(Vec2::new(x, t), Vec2::new(x, b)));
    }
    for i in 1..GRID_DIVISIONS {
        let y = t + cell.y * i as f32;
        lines.push(Line::new(Vec2::new(l, y), Vec2::new(r, y)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        lines: usize,
        polylines: Vec<Rgba8>,
        circles: Vec<Dot>,
    }

    impl CurveRenderer for Recorder {
        fn draw_line(&mut self, _line: Line, _color: Rgba8, _width: f32) {
            self.lines += 1;
        }

        fn draw_polyline(&mut self, _points: &[Vec2], color: Rgba8, _width: f32) {
            self.polylines.push(color);
        }

        fn fill_circle(&mut self, dot: Dot) {
            self.circles.push(dot);
        }
    }

    fn config() -> EditorConfig {
        EditorConfig {
            density: 1.0,
            ..EditorConfig::default()
        }
    }

    fn store() -> CurveStore {
        CurveStore::new(PlotBounds::new(220.0, 220.0, 10.0), 10.0)
    }

    #[test]
    fn test_degenerate_bounds_build_empty_scene() {
        let store = CurveStore::new(PlotBounds::default(), 10.0);
        assert!(CurveScene::build(&store, &config()).is_empty());
    }

    #[test]
    fn test_grid_has_border_and_quarters() {
        let scene = CurveScene::build(&store(), &config());
        assert_eq!(scene.grid.len(), 4 + 3 + 3);
        assert_eq!(scene.grid[4].from, Vec2::new(60.0, 10.0));
    }

    #[test]
    fn test_only_populated_channels_get_layers() {
        let mut store = store();
        store.set_active_channel(Channel::Red);
        let scene = CurveScene::build(&store, &config());
        let channels: Vec<Channel> = scene.layers.iter().map(|l| l.channel).collect();
        assert_eq!(channels, vec![Channel::Red, Channel::Combined]);
        assert_eq!(scene.layers[0].color, Channel::Red.color());
        assert_eq!(scene.layers[1].color, Channel::Combined.reference_color());
    }

    #[test]
    fn test_active_polyline_starts_and_ends_on_endpoints() {
        let scene = CurveScene::build(&store(), &config());
        let layer = scene.active_layer().unwrap();
        assert_eq!(layer.polyline.first(), Some(&Vec2::new(10.0, 210.0)));
        assert_eq!(layer.polyline.last(), Some(&Vec2::new(210.0, 10.0)));
    }

    #[test]
    fn test_selection_dot_color_depends_on_channel() {
        let mut store = store();
        store.select(Some(1));
        let scene = CurveScene::build(&store, &config());
        assert_eq!(scene.selection.unwrap().color, SELECTED_POINT_COLOR);

        store.set_active_channel(Channel::Blue);
        store.select(Some(0));
        let scene = CurveScene::build(&store, &config());
        assert_eq!(scene.selection.unwrap().color, Channel::Blue.color());
    }

    #[test]
    fn test_paint_order() {
        let mut store = store();
        store.select(Some(0));
        let scene = CurveScene::build(&store, &config());
        let mut recorder = Recorder::default();
        scene.paint(&mut recorder);
        assert_eq!(recorder.lines, 11);
        assert_eq!(recorder.polylines, vec![Channel::Combined.color()]);
        assert_eq!(recorder.circles.len(), 3);
        assert_eq!(recorder.circles[2].color, SELECTED_POINT_COLOR);
    }
}
