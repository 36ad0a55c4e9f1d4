//! Pointer-driven editing of the active channel.
//!
//! ```text
//! Idle ──down──▶ Pressed ──move > slop──▶ Dragging
//!   ▲               │                        │
//!   └────────── up / cancel ◀────────────────┘
//! ```
//!
//! A press selects the point under the pointer or inserts one into the
//! gap under it. Once the pointer has travelled more than [`TOUCH_SLOP`]
//! pixels on either axis, moves drag the selection with the store's
//! clamping rules. Release reports whether the selected point ended up
//! somewhere other than where the press found it.
//!
//! Redraw requests coalesce: the host polls [`ToneCurveEditor::take_redraw_request`]
//! and calls [`ToneCurveEditor::redraw`] at most once per frame.

use glam::Vec2;

use crate::channel::Channel;
use crate::config::EditorConfig;
use crate::events::{BoxedListener, ChangeNotifier, CurveEvent, ToneCurveListener};
use crate::geometry::PlotBounds;
use crate::lut::ToneLut;
use crate::scene::CurveScene;
use crate::spline::sample_curve;
use crate::store::{CurveStore, MAX_POINTS};

/// Pointer travel, in pixels on either axis, before a press becomes a drag.
pub const TOUCH_SLOP: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

/// Per-press bookkeeping, reset on every pointer-down.
#[derive(Debug, Clone, Copy, Default)]
struct EditSession {
    /// Pointer position at press time.
    down: Vec2,
    /// Selected point's position at press time, if the press hit one.
    snapshot: Option<Vec2>,
    /// The press created the selected point.
    inserted: bool,
}

/// The tone curve editor: channel store, edit state machine, and notifier.
#[derive(Debug)]
pub struct ToneCurveEditor {
    config: EditorConfig,
    store: CurveStore,
    notifier: ChangeNotifier,
    phase: EditPhase,
    session: EditSession,
    /// Layout received mid-session, applied when the session ends.
    pending_bounds: Option<PlotBounds>,
    redraw_requested: bool,
}

impl ToneCurveEditor {
    /// Create an editor with no layout yet; call [`layout`](Self::layout)
    /// once the host knows the widget size.
    pub fn new(config: EditorConfig) -> Self {
        let store = CurveStore::new(PlotBounds::default(), config.hit_radius_px());
        Self {
            config,
            store,
            notifier: ChangeNotifier::new(),
            phase: EditPhase::Idle,
            session: EditSession::default(),
            pending_bounds: None,
            redraw_requested: false,
        }
    }

    pub fn with_listener(mut self, listener: impl ToneCurveListener + Send + 'static) -> Self {
        self.notifier.set_listener(Some(Box::new(listener)));
        self
    }

    /// Replace or remove the listener. Without one, events are dropped.
    pub fn set_listener(&mut self, listener: Option<BoxedListener>) {
        self.notifier.set_listener(listener);
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &CurveStore {
        &self.store
    }

    pub fn bounds(&self) -> PlotBounds {
        self.store.bounds()
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    /// Host layout pass. Deferred while a pointer session is in progress so
    /// a drag never sees two different coordinate mappings.
    pub fn layout(&mut self, width: f32, height: f32) {
        let bounds = self.config.bounds(width, height);
        if self.phase != EditPhase::Idle {
            tracing::debug!("layout {width}x{height} deferred until pointer release");
            self.pending_bounds = Some(bounds);
            return;
        }
        self.store.set_bounds(bounds);
        self.request_redraw();
    }

    // ── Channel data ─────────────────────────────────────────────

    pub fn active_channel(&self) -> Channel {
        self.store.active_channel()
    }

    pub fn set_active_channel(&mut self, channel: Channel) {
        self.store.set_active_channel(channel);
        self.request_redraw();
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.store.selected_index()
    }

    /// Pixel-space points of a channel.
    pub fn points(&self, channel: Channel) -> &[Vec2] {
        self.store.points(channel)
    }

    pub fn set_points(&mut self, channel: Channel, points: Vec<Vec2>) {
        self.store.set_points(channel, points);
        self.request_redraw();
    }

    pub fn normalized_points(&self, channel: Channel) -> Vec<Vec2> {
        self.store.normalized_points(channel)
    }

    pub fn set_normalized_points(&mut self, channel: Channel, points: &[Vec2]) {
        self.store.set_normalized_points(channel, points);
        self.request_redraw();
    }

    pub fn reset_channel(&mut self, channel: Channel) {
        self.store.reset_channel(channel);
        self.request_redraw();
    }

    /// Sampled curve of any channel in normalized space.
    pub fn sample_channel(&self, channel: Channel) -> Vec<Vec2> {
        sample_curve(&self.store.normalized_points(channel))
    }

    pub fn tone_lut(&self, size: usize) -> ToneLut {
        ToneLut::from_store(&self.store, size)
    }

    // ── Pointer input ────────────────────────────────────────────

    pub fn pointer_down(&mut self, position: Vec2) {
        if self.phase != EditPhase::Idle {
            tracing::debug!("pointer down without release, restarting session");
        }
        self.store.ensure_active_seeded();
        self.phase = EditPhase::Pressed;
        self.session = EditSession {
            down: position,
            ..EditSession::default()
        };

        let channel = self.store.active_channel();
        let hit = self.store.hit_test(position);
        self.store.select(hit);
        let at_cap = hit.is_none() && self.store.active_points().len() >= MAX_POINTS;

        if at_cap {
            tracing::debug!("{channel} already has {MAX_POINTS} points");
            self.notifier.emit(CurveEvent::CurvePointsReachMax);
        }
        self.notifier.emit(CurveEvent::EditStart);

        match hit {
            Some(index) => {
                tracing::debug!("pressed point {index} on {channel}");
                self.session.snapshot = self.store.selected_point();
            }
            None if !at_cap => {
                if let Some(index) = self.store.insert_if_in_gap(position) {
                    self.store.select(Some(index));
                    self.session.inserted = true;
                    self.notifier.mark_editing();
                    let point = self.store.active_points()[index];
                    self.notifier.emit(CurveEvent::PointTouched {
                        point: self.store.bounds().normalize(point),
                        channel,
                        is_new: true,
                        is_edge: self.store.is_edge_selected(),
                    });
                }
            }
            None => {}
        }
        self.request_redraw();
    }

    pub fn pointer_move(&mut self, position: Vec2) {
        if self.phase == EditPhase::Pressed {
            let travel = (position - self.session.down).abs();
            if travel.x > TOUCH_SLOP || travel.y > TOUCH_SLOP {
                tracing::debug!("drag started");
                self.phase = EditPhase::Dragging;
            }
        }
        if self.phase != EditPhase::Dragging {
            return;
        }

        let Some(written) = self.store.move_selected(position) else {
            return;
        };
        self.notifier.mark_editing();
        self.notifier.emit(CurveEvent::PointTouched {
            point: self.store.bounds().normalize(written),
            channel: self.store.active_channel(),
            is_new: false,
            is_edge: self.store.is_edge_selected(),
        });
        self.request_redraw();
    }

    pub fn pointer_up(&mut self) {
        self.finish_session("up");
    }

    /// Same as [`pointer_up`](Self::pointer_up); the pointer may be anywhere.
    pub fn pointer_cancel(&mut self) {
        self.finish_session("cancel");
    }

    /// Every up/cancel reports `EditFinished`; without a session it is
    /// always unchanged.
    fn finish_session(&mut self, reason: &str) {
        if self.phase == EditPhase::Idle {
            tracing::debug!("pointer {reason} without an active session");
            self.notifier.emit(CurveEvent::EditFinished { changed: false });
            return;
        }

        let changed = match self.store.selected_point() {
            Some(point) => self.session.inserted || self.session.snapshot != Some(point),
            None => false,
        };
        tracing::debug!("pointer {reason}, changed={changed}");
        self.notifier.emit(CurveEvent::EditFinished { changed });
        self.phase = EditPhase::Idle;
        // Selection stays so the point keeps its highlight.

        if let Some(bounds) = self.pending_bounds.take() {
            self.store.set_bounds(bounds);
        }
        self.request_redraw();
    }

    // ── Redraw cycle ─────────────────────────────────────────────

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn is_redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Consume the pending redraw request. Any number of requests since the
    /// last call collapse into one `true`.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Run one redraw: emit `PointsChanged` if the active channel was edited
    /// since the previous redraw, then build the frame's scene.
    pub fn redraw(&mut self) -> CurveScene {
        self.redraw_requested = false;
        self.store.ensure_active_seeded();

        let store = &self.store;
        self.notifier.on_redraw(|| CurveEvent::PointsChanged {
            points: store.normalized_points(store.active_channel()),
            channel: store.active_channel(),
            is_edge_selected: store.is_edge_selected(),
        });
        CurveScene::build(&self.store, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CurveEventQueue;

    const EPSILON: f32 = 1e-4;

    /// 220×220 widget with a 10.5 px inset and a 10.5 px hit radius.
    fn editor() -> (ToneCurveEditor, CurveEventQueue) {
        let config = EditorConfig {
            density: 1.0,
            inset_dp: 10.0,
            hit_radius_dp: 10.0,
            ..EditorConfig::default()
        };
        let queue = CurveEventQueue::new();
        let mut editor = ToneCurveEditor::new(config).with_listener(queue.clone());
        editor.layout(220.0, 220.0);
        editor.redraw();
        (editor, queue)
    }

    fn center(editor: &ToneCurveEditor) -> Vec2 {
        editor.bounds().denormalize(Vec2::new(0.5, 0.5))
    }

    #[test]
    fn test_press_in_gap_inserts_and_selects() {
        let (mut editor, queue) = editor();
        editor.pointer_down(center(&editor));

        assert_eq!(editor.points(Channel::Combined).len(), 3);
        assert_eq!(editor.selected_index(), Some(1));
        let events = queue.drain();
        assert_eq!(events[0], CurveEvent::EditStart);
        match &events[1] {
            CurveEvent::PointTouched { point, is_new, .. } => {
                assert!(*is_new);
                assert!((point.x - 0.5).abs() < EPSILON);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_press_on_point_selects_without_insert() {
        let (mut editor, queue) = editor();
        let start = editor.points(Channel::Combined)[0];
        editor.pointer_down(start + Vec2::new(3.0, -3.0));
        assert_eq!(editor.selected_index(), Some(0));
        assert_eq!(editor.points(Channel::Combined).len(), 2);
        assert_eq!(queue.drain(), vec![CurveEvent::EditStart]);
    }

    #[test]
    fn test_release_without_move_is_unchanged() {
        let (mut editor, queue) = editor();
        let start = editor.points(Channel::Combined)[1];
        editor.pointer_down(start);
        editor.pointer_move(start + Vec2::new(4.0, 4.0));
        editor.pointer_up();
        let events = queue.drain();
        assert_eq!(events.last(), Some(&CurveEvent::EditFinished { changed: false }));
        assert_eq!(editor.points(Channel::Combined)[1], start);
        assert_eq!(editor.phase(), EditPhase::Idle);
    }

    #[test]
    fn test_moves_below_slop_do_not_drag() {
        let (mut editor, _queue) = editor();
        let start = editor.points(Channel::Combined)[0];
        editor.pointer_down(start);
        editor.pointer_move(start + Vec2::new(0.0, -10.0));
        assert_eq!(editor.phase(), EditPhase::Pressed);
        editor.pointer_move(start + Vec2::new(0.0, -10.5));
        assert_eq!(editor.phase(), EditPhase::Dragging);
    }

    #[test]
    fn test_drag_endpoint_keeps_x_pinned() {
        let (mut editor, queue) = editor();
        let bounds = editor.bounds();
        let start = editor.points(Channel::Combined)[0];
        editor.pointer_down(start);
        editor.pointer_move(bounds.denormalize(Vec2::new(0.9, 0.4)));
        editor.pointer_up();

        let moved = editor.normalized_points(Channel::Combined)[0];
        assert_eq!(moved.x, 0.0);
        assert!((moved.y - 0.4).abs() < EPSILON);
        let events = queue.drain();
        assert!(events.contains(&CurveEvent::EditFinished { changed: true }));
    }

    #[test]
    fn test_points_changed_fires_once_per_redraw_after_edit() {
        let (mut editor, queue) = editor();
        let start = editor.points(Channel::Combined)[1];
        editor.pointer_down(start);
        editor.pointer_move(start + Vec2::new(0.0, 30.0));
        editor.pointer_move(start + Vec2::new(0.0, 40.0));
        queue.drain();

        assert!(editor.take_redraw_request());
        assert!(!editor.take_redraw_request());
        editor.redraw();
        editor.redraw();
        let changed: Vec<_> = queue
            .drain()
            .into_iter()
            .filter(|e| matches!(e, CurveEvent::PointsChanged { .. }))
            .collect();
        assert_eq!(changed.len(), 1);
        match &changed[0] {
            CurveEvent::PointsChanged {
                points,
                is_edge_selected,
                ..
            } => {
                assert_eq!(points.len(), 2);
                assert!(*is_edge_selected);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_full_channel_reports_reach_max() {
        let (mut editor, queue) = editor();
        let curve: Vec<Vec2> = (0..MAX_POINTS)
            .map(|i| Vec2::new(i as f32 / (MAX_POINTS - 1) as f32, 0.3))
            .collect();
        editor.set_normalized_points(Channel::Combined, &curve);
        queue.drain();

        editor.pointer_down(editor.bounds().denormalize(Vec2::new(0.5, 0.9)));
        assert_eq!(
            queue.drain(),
            vec![CurveEvent::CurvePointsReachMax, CurveEvent::EditStart]
        );
        assert_eq!(editor.points(Channel::Combined).len(), MAX_POINTS);
        editor.pointer_up();
        assert_eq!(queue.drain(), vec![CurveEvent::EditFinished { changed: false }]);
    }

    #[test]
    fn test_inserted_point_counts_as_change() {
        let (mut editor, queue) = editor();
        editor.pointer_down(center(&editor));
        editor.pointer_up();
        assert_eq!(queue.drain().last(), Some(&CurveEvent::EditFinished { changed: true }));
    }

    #[test]
    fn test_selection_survives_release() {
        let (mut editor, _queue) = editor();
        editor.pointer_down(center(&editor));
        editor.pointer_up();
        assert_eq!(editor.selected_index(), Some(1));
        assert!(editor.redraw().selection.is_some());
    }

    #[test]
    fn test_layout_is_deferred_during_drag() {
        let (mut editor, _queue) = editor();
        let before = editor.bounds();
        editor.pointer_down(center(&editor));
        editor.layout(440.0, 440.0);
        assert_eq!(editor.bounds(), before);
        editor.pointer_cancel();
        assert_ne!(editor.bounds(), before);
        let n = editor.normalized_points(Channel::Combined)[1];
        assert!((n - Vec2::new(0.5, 0.5)).abs().max_element() < EPSILON);
    }

    #[test]
    fn test_release_without_press_finishes_unchanged() {
        let (mut editor, queue) = editor();
        let before = editor.points(Channel::Combined).to_vec();
        editor.pointer_cancel();
        editor.pointer_up();
        assert_eq!(
            queue.drain(),
            vec![
                CurveEvent::EditFinished { changed: false },
                CurveEvent::EditFinished { changed: false },
            ]
        );
        assert_eq!(editor.phase(), EditPhase::Idle);
        assert_eq!(editor.points(Channel::Combined), before.as_slice());
    }

    #[test]
    fn test_drag_steps_report_edge_flag() {
        let (mut editor, queue) = editor();
        editor.pointer_down(center(&editor));
        editor.pointer_up();
        let last = editor.points(Channel::Combined)[2];
        editor.pointer_down(last);
        editor.pointer_move(last + Vec2::new(0.0, 40.0));
        let inner = editor.points(Channel::Combined)[1];
        editor.pointer_up();
        editor.pointer_down(inner);
        editor.pointer_move(inner + Vec2::new(0.0, 40.0));
        editor.pointer_up();

        let flags: Vec<(bool, bool)> = queue
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                CurveEvent::PointTouched { is_new, is_edge, .. } => Some((is_new, is_edge)),
                _ => None,
            })
            .collect();
        assert_eq!(flags, vec![(true, false), (false, true), (false, false)]);
    }

    #[test]
    fn test_layout_with_no_area_keeps_points() {
        let (mut editor, _queue) = editor();
        let at = editor.bounds().denormalize(Vec2::new(0.5, 0.8));
        editor.pointer_down(at);
        editor.pointer_up();
        let before = editor.normalized_points(Channel::Combined);

        editor.layout(0.0, 0.0);
        assert!(editor.redraw().is_empty());
        editor.pointer_down(Vec2::new(0.0, 0.0));
        editor.pointer_up();
        editor.layout(220.0, 220.0);

        let after = editor.normalized_points(Channel::Combined);
        assert_eq!(after.len(), 3);
        for (a, b) in before.iter().zip(&after) {
            assert!((*a - *b).abs().max_element() < EPSILON);
        }
    }

    #[test]
    fn test_no_listener_is_silent() {
        let mut editor = ToneCurveEditor::new(EditorConfig::default());
        editor.layout(300.0, 300.0);
        let c = editor.bounds().denormalize(Vec2::new(0.5, 0.5));
        editor.pointer_down(c);
        editor.pointer_move(c + Vec2::new(20.0, 0.0));
        editor.pointer_up();
        editor.redraw();
        assert_eq!(editor.points(Channel::Combined).len(), 3);
    }
}
