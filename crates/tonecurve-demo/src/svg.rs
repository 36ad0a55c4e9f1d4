//! Minimal SVG backend for [`CurveScene`] snapshots.

use std::fmt::Write;

use glam::Vec2;
use tonecurve_core::CurveRenderer;
use tonecurve_core::channel::Rgba8;
use tonecurve_core::scene::{Dot, Line};

/// Background behind the plot.
const BACKGROUND: &str = "#1e1e1e";

/// Collects SVG elements for one scene.
pub struct SvgRenderer {
    width: f32,
    height: f32,
    body: String,
}

impl SvgRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Close the document and return its text.
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
             <rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\"/>\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body,
        )
    }
}

fn color_attrs(color: Rgba8) -> (String, f32) {
    let [r, g, b, a] = color;
    (format!("#{r:02x}{g:02x}{b:02x}"), f32::from(a) / 255.0)
}

impl CurveRenderer for SvgRenderer {
    fn draw_line(&mut self, line: Line, color: Rgba8, width: f32) {
        let (stroke, opacity) = color_attrs(color);
        // Writing into a String cannot fail.
        let _ = writeln!(
            self.body,
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{stroke}\" stroke-opacity=\"{opacity:.3}\" stroke-width=\"{width:.2}\"/>",
            line.from.x, line.from.y, line.to.x, line.to.y,
        );
    }

    fn draw_polyline(&mut self, points: &[Vec2], color: Rgba8, width: f32) {
        let (stroke, opacity) = color_attrs(color);
        let coords = points
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            self.body,
            "<polyline points=\"{coords}\" fill=\"none\" stroke=\"{stroke}\" stroke-opacity=\"{opacity:.3}\" stroke-width=\"{width:.2}\"/>",
        );
    }

    fn fill_circle(&mut self, dot: Dot) {
        let (fill, opacity) = color_attrs(dot.color);
        let _ = writeln!(
            self.body,
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{fill}\" fill-opacity=\"{opacity:.3}\"/>",
            dot.center.x, dot.center.y, dot.radius,
        );
    }
}
