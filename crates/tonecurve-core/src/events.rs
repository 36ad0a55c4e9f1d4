//! Edit notifications: the listener contract and the redraw-driven notifier.

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// Receives edit notifications from a [`ToneCurveEditor`](crate::ToneCurveEditor).
///
/// All points are in normalized `[0, 1]` space. Every method has an empty
/// default so hosts only implement what they care about.
pub trait ToneCurveListener {
    /// The active channel is full and a press missed every existing point.
    fn on_curve_points_reach_max(&mut self) {}

    /// A point was created (`is_new`) or moved by a drag step. `is_edge` is
    /// set when the point is the first or last of its channel.
    fn on_point_touched(
        &mut self,
        _point: Vec2,
        _channel: Channel,
        _is_new: bool,
        _is_edge: bool,
    ) {
    }

    /// Once per redraw that followed an edit, with the whole active channel.
    fn on_points_changed(&mut self, _points: &[Vec2], _channel: Channel, _is_edge_selected: bool) {}

    /// Pointer released or cancelled.
    fn on_edit_finished(&mut self, _changed: bool) {}

    /// Every pointer press.
    fn on_edit_start(&mut self) {}
}

/// Owned mirror of the listener calls, for queues and JSON transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CurveEvent {
    CurvePointsReachMax,
    PointTouched {
        point: Vec2,
        channel: Channel,
        is_new: bool,
        is_edge: bool,
    },
    PointsChanged {
        points: Vec<Vec2>,
        channel: Channel,
        is_edge_selected: bool,
    },
    EditFinished {
        changed: bool,
    },
    EditStart,
}

impl CurveEvent {
    /// Deliver this event to the matching listener method.
    pub fn dispatch(&self, listener: &mut dyn ToneCurveListener) {
        match self {
            Self::CurvePointsReachMax => listener.on_curve_points_reach_max(),
            Self::PointTouched {
                point,
                channel,
                is_new,
                is_edge,
            } => listener.on_point_touched(*point, *channel, *is_new, *is_edge),
            Self::PointsChanged {
                points,
                channel,
                is_edge_selected,
            } => listener.on_points_changed(points, *channel, *is_edge_selected),
            Self::EditFinished { changed } => listener.on_edit_finished(*changed),
            Self::EditStart => listener.on_edit_start(),
        }
    }
}

/// Listener that buffers events for the host to drain later.
///
/// Clones share the same buffer, so one handle can be given to the editor
/// and another kept by the host.
#[derive(Debug, Clone, Default)]
pub struct CurveEventQueue {
    events: Arc<Mutex<Vec<CurveEvent>>>,
}

impl CurveEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: CurveEvent) {
        self.events.lock().push(event);
    }

    /// Take every buffered event, oldest first.
    pub fn drain(&self) -> Vec<CurveEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl ToneCurveListener for CurveEventQueue {
    fn on_curve_points_reach_max(&mut self) {
        self.push(CurveEvent::CurvePointsReachMax);
    }

    fn on_point_touched(&mut self, point: Vec2, channel: Channel, is_new: bool, is_edge: bool) {
        self.push(CurveEvent::PointTouched {
            point,
            channel,
            is_new,
            is_edge,
        });
    }

    fn on_points_changed(&mut self, points: &[Vec2], channel: Channel, is_edge_selected: bool) {
        self.push(CurveEvent::PointsChanged {
            points: points.to_vec(),
            channel,
            is_edge_selected,
        });
    }

    fn on_edit_finished(&mut self, changed: bool) {
        self.push(CurveEvent::EditFinished { changed });
    }

    fn on_edit_start(&mut self) {
        self.push(CurveEvent::EditStart);
    }
}

/// Boxed listener as stored by the editor.
pub type BoxedListener = Box<dyn ToneCurveListener + Send>;

/// Forwards editor events to the optional listener and emits
/// `PointsChanged` from the redraw cycle.
#[derive(Default)]
pub struct ChangeNotifier {
    listener: Option<BoxedListener>,
    editing: bool,
    has_drawn: bool,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_listener(&mut self, listener: Option<BoxedListener>) {
        self.listener = listener;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Forward an event immediately. Without a listener this is a no-op.
    pub fn emit(&mut self, event: CurveEvent) {
        tracing::trace!(?event, "curve event");
        if let Some(listener) = self.listener.as_mut() {
            event.dispatch(listener.as_mut());
        }
    }

    /// Flag that the active channel was edited since the last redraw.
    pub fn mark_editing(&mut self) {
        self.editing = true;
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Redraw hook. Emits the event built by `changed` once if an edit
    /// happened since the last redraw; the very first redraw never emits.
    /// Returns whether an event was emitted.
    pub fn on_redraw(&mut self, changed: impl FnOnce() -> CurveEvent) -> bool {
        if !self.has_drawn {
            self.has_drawn = true;
            return false;
        }
        if !self.editing {
            return false;
        }
        self.editing = false;
        let event = changed();
        tracing::debug!("points changed after edit");
        self.emit(event);
        true
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("has_listener", &self.listener.is_some())
            .field("editing", &self.editing)
            .field("has_drawn", &self.has_drawn)
            .finish()
    }
}
