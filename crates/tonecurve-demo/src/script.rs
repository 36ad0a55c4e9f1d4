//! Scripted host actions replayed against a [`ToneCurveEditor`].
//!
//! Scripts are JSON arrays using the same `{"type": ..., "data": ...}`
//! shape as [`CurveEvent`](tonecurve_core::CurveEvent):
//!
//! ```json
//! [
//!   { "type": "Layout", "data": { "width": 600, "height": 480 } },
//!   { "type": "Down", "data": { "x": 300, "y": 200 } },
//!   { "type": "Move", "data": { "x": 300, "y": 120 } },
//!   { "type": "Up" },
//!   { "type": "Redraw" }
//! ]
//! ```

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tonecurve_core::{Channel, CurveScene, ToneCurveEditor};

/// One step of host input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum HostAction {
    /// Widget resized (pixels).
    Layout { width: f32, height: f32 },
    /// Switch the edited channel (0 = RGB, 1 = R, 2 = G, 3 = B).
    SetChannel { channel: u8 },
    /// Replace a channel with normalized points.
    SetPoints { channel: u8, points: Vec<[f32; 2]> },
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Cancel,
    /// Frame boundary: repaint if a redraw was requested since the last one.
    Redraw,
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_script(path: &Path) -> Result<Vec<HostAction>, ScriptError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Replay `actions`, returning the last painted scene (if any frame was painted).
///
/// Redraw requests coalesce: a `Redraw` step only repaints when the editor
/// asked for one since the previous frame. A final frame is painted after
/// the script if a request is still pending.
pub fn replay(editor: &mut ToneCurveEditor, actions: &[HostAction]) -> Option<CurveScene> {
    let mut last_scene = None;
    let mut frames = 0usize;

    for action in actions {
        match action {
            HostAction::Layout { width, height } => editor.layout(*width, *height),
            HostAction::SetChannel { channel } => match Channel::try_from(*channel) {
                Ok(channel) => editor.set_active_channel(channel),
                Err(e) => tracing::warn!("skipping SetChannel: {e}"),
            },
            HostAction::SetPoints { channel, points } => match Channel::try_from(*channel) {
                Ok(channel) => {
                    let points: Vec<Vec2> = points.iter().map(|p| Vec2::from_array(*p)).collect();
                    editor.set_normalized_points(channel, &points);
                }
                Err(e) => tracing::warn!("skipping SetPoints: {e}"),
            },
            HostAction::Down { x, y } => editor.pointer_down(Vec2::new(*x, *y)),
            HostAction::Move { x, y } => editor.pointer_move(Vec2::new(*x, *y)),
            HostAction::Up => editor.pointer_up(),
            HostAction::Cancel => editor.pointer_cancel(),
            HostAction::Redraw => {
                if editor.take_redraw_request() {
                    last_scene = Some(editor.redraw());
                    frames += 1;
                }
            }
        }
    }

    if editor.take_redraw_request() {
        last_scene = Some(editor.redraw());
        frames += 1;
    }
    tracing::info!("replayed {} actions in {frames} frames", actions.len());
    last_scene
}
