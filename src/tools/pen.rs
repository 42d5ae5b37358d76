// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool: builds a cubic bezier path from pointer events.
//!
//! Press to place an anchor, drag to pull out its handles, release to fix
//! them. Move the pointer (no button) to preview the next segment, press
//! again for the next anchor. Pressing near the first anchor closes the
//! path; `finish` ends it open. `cancel` drops the anchor being dragged.
//!
//! ```text
//!            press                      release
//! Initial ─────────► DraggingTheControlOfLast ─────────► MovingToNextCurvePoint
//!                          ▲                                 │   │
//!                          └──────────── press ──────────────┘   │ press near first
//!                                                                ▼
//!                                                             Closed
//! ```
//!
//! Pointer events from a toolkit do not always arrive in order (the user
//! may switch tools mid-drag and come back). Missing presses and releases
//! are synthesized instead of being treated as errors.

use crate::config::{ConfigError, PenConfig};
use crate::editing::history::{EditSink, PathEdit};
use crate::editing::hit_test::ProximityDetector;
use crate::editing::mouse::PointerEvent;
use crate::editing::viewport::CoordinateMapper;
use crate::editing::EditType;
use crate::model::EntityId;
use crate::path::{self, AnchorPoint, HandleMode, Path};
use crate::settings;
use kurbo::{CubicBez, Point, Vec2};

/// Observable state of the pen tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenState {
    /// No anchors yet
    Initial,
    /// The pointer is down and pulls the last anchor's outgoing handle
    DraggingTheControlOfLast,
    /// Waiting for the next press while previewing the next segment
    MovingToNextCurvePoint,
    /// The path was closed; further events are ignored
    Closed,
    /// The path was finished open; further events are ignored
    Finished,
}

impl PenState {
    /// True once no more anchors can be added
    pub fn is_terminal(self) -> bool {
        matches!(self, PenState::Closed | PenState::Finished)
    }
}

/// Internal state with the data each phase needs
#[derive(Debug, Clone, Copy)]
enum Phase {
    Initial,
    Dragging {
        /// Index of the anchor whose handle is being dragged
        anchor: usize,
        /// Latest drag position, replayed as a release if one goes missing
        last: PointerEvent,
    },
    Moving {
        /// Image-space cursor for the preview segment
        cursor: Option<Point>,
    },
    Closed,
    Finished,
}

/// The pen tool state machine
///
/// Owns the path being built and the sink that receives the finished
/// path. One builder authors one path; construct a new one afterwards.
#[derive(Debug)]
pub struct PathBuilder<S: EditSink> {
    path: Path,
    phase: Phase,
    mapper: CoordinateMapper,
    detector: ProximityDetector,
    /// Shift-drag angle step in radians
    angle_step: f64,
    sink: S,
}

impl<S: EditSink> PathBuilder<S> {
    /// Create a builder with an explicit view transform
    pub fn new(mapper: CoordinateMapper, config: &PenConfig, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            path: Path::new(),
            phase: Phase::Initial,
            mapper,
            detector: ProximityDetector::new(config.close_threshold_px)?,
            angle_step: config.angle_snap_degrees.to_radians(),
            sink,
        })
    }

    /// Create a builder using the config's zoom and offset
    pub fn from_config(config: &PenConfig, sink: S) -> Result<Self, ConfigError> {
        Self::new(config.mapper()?, config, sink)
    }

    // ===== Queries =====

    pub fn state(&self) -> PenState {
        match self.phase {
            Phase::Initial => PenState::Initial,
            Phase::Dragging { .. } => PenState::DraggingTheControlOfLast,
            Phase::Moving { .. } => PenState::MovingToNextCurvePoint,
            Phase::Closed => PenState::Closed,
            Phase::Finished => PenState::Finished,
        }
    }

    /// The path being built
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Index of the anchor whose handle is being dragged
    pub fn active_anchor(&self) -> Option<usize> {
        match self.phase {
            Phase::Dragging { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    /// Id of the anchor whose handle is being dragged
    pub fn active_anchor_id(&self) -> Option<EntityId> {
        self.active_anchor()
            .and_then(|i| self.path.anchor(i))
            .map(AnchorPoint::id)
    }

    /// Whether a press now would close the path
    pub fn is_closable(&self) -> bool {
        self.path.first().is_some_and(AnchorPoint::is_active)
    }

    /// Image-space cursor position while waiting for the next press
    pub fn cursor(&self) -> Option<Point> {
        match self.phase {
            Phase::Moving { cursor } => cursor,
            _ => None,
        }
    }

    /// The segment a press would create, for live preview
    ///
    /// When the path is closable this is the closing segment.
    pub fn preview_segment(&self) -> Option<CubicBez> {
        let cursor = self.cursor()?;
        let last = self.path.last_appended()?;
        if self.is_closable() {
            let first = self.path.first()?;
            return Some(path::segment_between(last, first));
        }
        Some(path::preview_segment(last, cursor))
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Replace the view transform after a zoom or scroll
    ///
    /// The closing affordance is re-evaluated at the last cursor position
    /// under the new transform.
    pub fn set_mapper(&mut self, mapper: CoordinateMapper) {
        self.mapper = mapper;
        match self.cursor() {
            Some(cursor) => self.update_closing_affordance(self.mapper.to_view(cursor)),
            None => self.clear_closing_affordance(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give up the builder, returning the path and the sink
    pub fn into_parts(self) -> (Path, S) {
        (self.path, self.sink)
    }

    // ===== Input events =====

    /// Pointer pressed
    pub fn pointer_pressed(&mut self, event: PointerEvent) {
        match self.phase {
            Phase::Closed | Phase::Finished => self.ignore("press"),
            Phase::Dragging { last, .. } => {
                tracing::warn!(
                    "[PathBuilder] press while dragging, releasing at ({}, {}) first",
                    last.pos.x,
                    last.pos.y
                );
                self.pointer_released(last);
                self.pointer_pressed(event);
            }
            Phase::Initial => self.start_anchor(event),
            Phase::Moving { .. } => {
                if self.press_closes(&event) {
                    self.close_path();
                } else {
                    self.start_anchor(event);
                }
            }
        }
    }

    /// Pointer dragged with the button down
    pub fn pointer_dragged(&mut self, event: PointerEvent) {
        match self.phase {
            Phase::Closed | Phase::Finished => self.ignore("drag"),
            Phase::Initial | Phase::Moving { .. } => {
                tracing::warn!("[PathBuilder] drag without press, pressing first");
                self.pointer_pressed(event);
                if let Phase::Dragging { anchor, .. } = self.phase {
                    self.drag_handle(anchor, event);
                }
            }
            Phase::Dragging { anchor, .. } => self.drag_handle(anchor, event),
        }
    }

    /// Pointer released
    pub fn pointer_released(&mut self, event: PointerEvent) {
        match self.phase {
            Phase::Closed | Phase::Finished => self.ignore("release"),
            Phase::Initial | Phase::Moving { .. } => {
                tracing::warn!("[PathBuilder] release without press, pressing first");
                self.pointer_pressed(event);
                if let Phase::Dragging { .. } = self.phase {
                    self.pointer_released(event);
                }
            }
            Phase::Dragging { anchor, .. } => {
                self.drag_handle(anchor, event);
                self.phase = Phase::Moving {
                    cursor: Some(event.pos),
                };
                tracing::debug!(
                    "[PathBuilder] handle of anchor {} fixed at ({}, {})",
                    anchor,
                    event.pos.x,
                    event.pos.y
                );
            }
        }
    }

    /// Pointer moved with no button down
    pub fn pointer_moved(&mut self, event: PointerEvent) {
        match self.phase {
            Phase::Closed | Phase::Finished => self.ignore("move"),
            Phase::Initial | Phase::Dragging { .. } => {}
            Phase::Moving { .. } => {
                self.phase = Phase::Moving {
                    cursor: Some(event.pos),
                };
                self.update_closing_affordance(event.view_pos);
            }
        }
    }

    /// Drop any unfinished anchor and return to a safe state
    ///
    /// Cancelling while dragging the first anchor leaves an empty path.
    /// Cancelling while dragging a later anchor removes just that anchor.
    pub fn cancel(&mut self) {
        match self.phase {
            Phase::Dragging { anchor, .. } => {
                debug_assert_eq!(anchor + 1, self.path.len());
                self.path.pop();
                self.clear_closing_affordance();
                self.phase = if self.path.is_empty() {
                    Phase::Initial
                } else {
                    Phase::Moving { cursor: None }
                };
                tracing::debug!(
                    "[PathBuilder] cancelled anchor {}, {} anchors remain",
                    anchor,
                    self.path.len()
                );
            }
            Phase::Moving { .. } => {
                self.clear_closing_affordance();
                self.phase = Phase::Moving { cursor: None };
            }
            Phase::Initial | Phase::Closed | Phase::Finished => {}
        }
    }

    /// End authoring with an open path
    ///
    /// Returns false if the path is too short or already complete.
    pub fn finish(&mut self) -> bool {
        if let Phase::Dragging { last, .. } = self.phase {
            self.pointer_released(last);
        }
        match self.phase {
            Phase::Moving { .. } if self.path.len() >= settings::pen::MIN_ANCHORS_TO_COMPLETE => {
                self.clear_closing_affordance();
                self.phase = Phase::Finished;
                self.emit(EditType::PathFinished);
                true
            }
            _ => false,
        }
    }

    // ===== Helpers =====

    fn start_anchor(&mut self, event: PointerEvent) {
        self.clear_closing_affordance();
        let anchor = self.path.push(AnchorPoint::new(event.pos, false));
        self.phase = Phase::Dragging { anchor, last: event };
        tracing::debug!(
            "[PathBuilder] anchor {} placed at ({}, {})",
            anchor,
            event.pos.x,
            event.pos.y
        );
    }

    fn drag_handle(&mut self, index: usize, event: PointerEvent) {
        let angle_step = self.angle_step;
        let Some(anchor) = self.path.anchor_mut(index) else {
            return;
        };
        if event.mods.alt {
            anchor.set_mode(HandleMode::Broken);
        }
        let target = if event.mods.shift {
            constrain_angle(anchor.position(), event.pos, angle_step)
        } else {
            event.pos
        };
        anchor.set_handle_out(target);
        self.phase = Phase::Dragging {
            anchor: index,
            last: event,
        };
    }

    /// Whether a press at `event` closes the path
    fn press_closes(&self, event: &PointerEvent) -> bool {
        self.is_closable() || self.near_first(event.view_pos)
    }

    /// Near the first anchor, in view space, with enough anchors to close
    fn near_first(&self, view_pos: Point) -> bool {
        if self.path.len() < settings::pen::MIN_ANCHORS_TO_COMPLETE {
            return false;
        }
        self.path.first().is_some_and(|first| {
            let target = self.mapper.to_view(first.position());
            self.detector.is_near(view_pos, target)
        })
    }

    fn update_closing_affordance(&mut self, view_pos: Point) {
        let near = self.near_first(view_pos);
        if let Some(first) = self.path.first_mut()
            && first.is_active() != near
        {
            first.set_active(near);
            tracing::trace!("[PathBuilder] closing affordance {}", near);
        }
    }

    fn clear_closing_affordance(&mut self) {
        if let Some(first) = self.path.first_mut() {
            first.set_active(false);
        }
    }

    fn close_path(&mut self) {
        self.clear_closing_affordance();
        self.path.close();
        self.phase = Phase::Closed;
        self.emit(EditType::PathClosed);
    }

    fn emit(&mut self, kind: EditType) {
        tracing::info!(
            "[PathBuilder] {} with {} anchors",
            kind.label(),
            self.path.len()
        );
        self.sink.record_path_completed(PathEdit {
            kind,
            snapshot: self.path.snapshot(),
        });
    }

    fn ignore(&self, what: &str) {
        tracing::debug!("[PathBuilder] {} ignored in {:?}", what, self.state());
    }
}

/// Snap `target` around `origin` to the nearest multiple of `step` radians,
/// keeping its distance
pub fn constrain_angle(origin: Point, target: Point, step: f64) -> Point {
    let v = target - origin;
    let len = v.hypot();
    if len == 0.0 || step <= 0.0 {
        return target;
    }
    let snapped = (v.atan2() / step).round() * step;
    origin + Vec2::from_angle(snapped) * len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::history::EditLog;
    use crate::editing::mouse::Modifiers;
    use approx::assert_abs_diff_eq;

    fn builder() -> PathBuilder<EditLog> {
        PathBuilder::from_config(&PenConfig::default(), EditLog::new()).unwrap()
    }

    fn zoomed_builder(zoom: f64) -> PathBuilder<EditLog> {
        let mapper = CoordinateMapper::new(zoom, Vec2::ZERO).unwrap();
        PathBuilder::new(mapper, &PenConfig::default(), EditLog::new()).unwrap()
    }

    /// Event at an image-space position, resolved with the builder's mapper
    fn ev<S: EditSink>(pb: &PathBuilder<S>, x: f64, y: f64) -> PointerEvent {
        PointerEvent::from_image(Point::new(x, y), pb.mapper())
    }

    fn press<S: EditSink>(pb: &mut PathBuilder<S>, x: f64, y: f64) {
        let e = ev(pb, x, y);
        pb.pointer_pressed(e);
    }

    fn drag<S: EditSink>(pb: &mut PathBuilder<S>, x: f64, y: f64) {
        let e = ev(pb, x, y);
        pb.pointer_dragged(e);
    }

    fn release<S: EditSink>(pb: &mut PathBuilder<S>, x: f64, y: f64) {
        let e = ev(pb, x, y);
        pb.pointer_released(e);
    }

    fn move_to<S: EditSink>(pb: &mut PathBuilder<S>, x: f64, y: f64) {
        let e = ev(pb, x, y);
        pb.pointer_moved(e);
    }

    /// Place an anchor and fix its handle in one go
    fn click_drag<S: EditSink>(pb: &mut PathBuilder<S>, at: (f64, f64), handle: (f64, f64)) {
        press(pb, at.0, at.1);
        drag(pb, handle.0, handle.1);
        release(pb, handle.0, handle.1);
    }

    // =============================================================
    // Reference interaction
    // =============================================================

    #[test]
    fn building_three_point_closed_path() {
        let mut pb = builder();
        assert_eq!(pb.state(), PenState::Initial);

        // start the curve
        press(&mut pb, 10.0, 10.0);
        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        assert_eq!(pb.path().len(), 1);
        assert_eq!(pb.path().anchor(0).unwrap().position(), Point::new(10.0, 10.0));
        assert_eq!(pb.active_anchor(), Some(0));

        // drag towards the right
        drag(&mut pb, 20.0, 10.0);
        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        let first = pb.path().anchor(0).unwrap();
        assert_eq!(first.handle_out_pos(), Point::new(20.0, 10.0));
        assert_eq!(first.handle_in_pos(), Point::new(0.0, 10.0));

        drag(&mut pb, 30.0, 10.0);
        drag(&mut pb, 40.0, 10.0);
        assert_eq!(pb.path().len(), 1);

        // release to fix the control point
        release(&mut pb, 50.0, 10.0);
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert_eq!(pb.path().len(), 1);
        assert_eq!(pb.active_anchor(), None);
        assert_eq!(pb.path().anchor(0).unwrap().handle_out_pos(), Point::new(50.0, 10.0));

        // move down towards the second anchor
        move_to(&mut pb, 50.0, 20.0);
        move_to(&mut pb, 50.0, 30.0);
        move_to(&mut pb, 50.0, 40.0);
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert_eq!(pb.path().len(), 1);

        // press to place the second anchor
        press(&mut pb, 50.0, 50.0);
        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.path().anchor(1).unwrap().position(), Point::new(50.0, 50.0));

        drag(&mut pb, 60.0, 50.0);
        drag(&mut pb, 70.0, 50.0);
        drag(&mut pb, 80.0, 50.0);
        release(&mut pb, 90.0, 50.0);
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.path().anchor(1).unwrap().handle_out_pos(), Point::new(90.0, 50.0));

        // move up and place the third anchor
        move_to(&mut pb, 90.0, 40.0);
        move_to(&mut pb, 90.0, 30.0);
        move_to(&mut pb, 90.0, 20.0);
        assert_eq!(pb.path().len(), 2);
        press(&mut pb, 90.0, 10.0);
        assert_eq!(pb.path().len(), 3);
        assert_eq!(pb.path().anchor(2).unwrap().position(), Point::new(90.0, 10.0));

        drag(&mut pb, 100.0, 10.0);
        drag(&mut pb, 110.0, 10.0);
        drag(&mut pb, 120.0, 10.0);
        release(&mut pb, 120.0, 10.0);
        assert_eq!(pb.path().len(), 3);
        assert_eq!(pb.path().anchor(2).unwrap().handle_out_pos(), Point::new(120.0, 10.0));

        // move towards the starting point in order to close
        assert!(!pb.path().is_closed());
        assert!(!pb.is_closable());
        move_to(&mut pb, 100.0, 10.0);
        move_to(&mut pb, 50.0, 10.0);
        assert!(!pb.path().is_closed());
        assert!(!pb.path().first().unwrap().is_active());

        move_to(&mut pb, 12.0, 10.0);
        assert!(!pb.path().is_closed());
        assert!(pb.path().first().unwrap().is_active());
        assert!(pb.is_closable());

        // now close it
        press(&mut pb, 11.0, 10.0);
        assert_eq!(pb.state(), PenState::Closed);
        assert!(pb.path().is_closed());
        assert!(!pb.path().first().unwrap().is_active());
        // the first anchor is reused, not duplicated
        assert_eq!(pb.path().len(), 3);
        assert_eq!(pb.path().end_index(), Some(0));
        assert_eq!(pb.path().segment_count(), 3);

        let log = pb.sink();
        assert_eq!(log.len(), 1);
        let edit = log.last().unwrap();
        assert_eq!(edit.kind, EditType::PathClosed);
        assert!(edit.snapshot.closed);
        assert_eq!(edit.snapshot.to_path(), *pb.path());
    }

    // =============================================================
    // Properties
    // =============================================================

    #[test]
    fn handle_drag_mirrors_incoming_handle() {
        for (dx, dy) in [(0.0, 0.0), (15.0, 0.0), (-3.0, 8.0), (250.0, -125.5)] {
            let mut pb = builder();
            press(&mut pb, 40.0, 40.0);
            drag(&mut pb, 40.0 + dx, 40.0 + dy);
            let anchor = pb.path().anchor(0).unwrap();
            assert_abs_diff_eq!(anchor.handle_out().offset().x, dx);
            assert_abs_diff_eq!(anchor.handle_out().offset().y, dy);
            assert_abs_diff_eq!(anchor.handle_in().offset().x, -dx);
            assert_abs_diff_eq!(anchor.handle_in().offset().y, -dy);
        }
    }

    #[test]
    fn only_placing_presses_change_the_count() {
        let mut pb = builder();
        press(&mut pb, 0.0, 0.0);
        assert_eq!(pb.path().len(), 1);
        drag(&mut pb, 5.0, 5.0);
        release(&mut pb, 6.0, 6.0);
        move_to(&mut pb, 100.0, 0.0);
        assert_eq!(pb.path().len(), 1);
        press(&mut pb, 100.0, 0.0);
        assert_eq!(pb.path().len(), 2);
        drag(&mut pb, 110.0, 0.0);
        release(&mut pb, 110.0, 0.0);
        move_to(&mut pb, 200.0, 50.0);
        assert_eq!(pb.path().len(), 2);
        press(&mut pb, 200.0, 50.0);
        assert_eq!(pb.path().len(), 3);
    }

    #[test]
    fn repeated_moves_never_touch_the_path() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (30.0, 10.0));
        click_drag(&mut pb, (60.0, 60.0), (80.0, 60.0));
        let before = pb.path().snapshot();

        for (x, y) in [(100.0, 100.0), (12.0, 10.0), (12.0, 10.0), (300.0, 0.0), (10.0, 9.0)] {
            move_to(&mut pb, x, y);
            assert_eq!(pb.path().snapshot(), before);
            assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        }
    }

    #[test]
    fn one_anchor_path_cannot_be_closed() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));

        move_to(&mut pb, 11.0, 10.0);
        assert!(!pb.is_closable());
        assert!(!pb.path().first().unwrap().is_active());

        press(&mut pb, 11.0, 10.0);
        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        assert_eq!(pb.path().len(), 2);
        assert!(!pb.path().is_closed());
        assert!(pb.sink().is_empty());
    }

    #[test]
    fn cancel_right_after_first_press_empties_the_path() {
        let mut pb = builder();
        press(&mut pb, 10.0, 10.0);
        pb.cancel();
        assert!(pb.path().is_empty());
        assert_eq!(pb.state(), PenState::Initial);

        // and authoring can start over
        press(&mut pb, 20.0, 20.0);
        assert_eq!(pb.path().len(), 1);
        assert!(pb.path().first().unwrap().is_first());
    }

    #[test]
    fn cancel_mid_drag_keeps_released_anchors() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        press(&mut pb, 90.0, 10.0);
        drag(&mut pb, 120.0, 10.0);

        pb.cancel();
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert_eq!(pb.path().len(), 2);
        assert!(!pb.path().is_closed());
        assert_eq!(pb.path().anchor(1).unwrap().handle_out_pos(), Point::new(90.0, 50.0));
    }

    #[test]
    fn cancel_while_moving_clears_the_affordance() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        move_to(&mut pb, 12.0, 10.0);
        assert!(pb.is_closable());

        pb.cancel();
        assert!(!pb.is_closable());
        assert!(pb.preview_segment().is_none());
        assert_eq!(pb.path().len(), 2);
    }

    // =============================================================
    // Closing
    // =============================================================

    #[test]
    fn moving_away_clears_the_affordance() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));

        move_to(&mut pb, 14.0, 13.0);
        assert!(pb.is_closable());
        move_to(&mut pb, 40.0, 40.0);
        assert!(!pb.is_closable());
    }

    #[test]
    fn press_near_first_closes_without_a_prior_move() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        press(&mut pb, 13.0, 12.0);
        assert_eq!(pb.state(), PenState::Closed);
        assert_eq!(pb.path().len(), 2);
    }

    #[test]
    fn closing_threshold_is_measured_in_view_pixels() {
        let mut pb = zoomed_builder(4.0);
        click_drag(&mut pb, (10.0, 10.0), (20.0, 10.0));
        click_drag(&mut pb, (40.0, 40.0), (50.0, 40.0));

        // 3.75 image px away, but 15 view px at 4x zoom
        move_to(&mut pb, 13.75, 10.0);
        assert!(!pb.is_closable());

        // 1.75 image px away, 7 view px
        move_to(&mut pb, 11.75, 10.0);
        assert!(pb.is_closable());
    }

    #[test]
    fn zooming_out_widens_the_image_space_reach() {
        let mut pb = zoomed_builder(0.5);
        click_drag(&mut pb, (10.0, 10.0), (20.0, 10.0));
        click_drag(&mut pb, (200.0, 200.0), (220.0, 200.0));

        // 16 image px away is 8 view px at 0.5x
        move_to(&mut pb, 26.0, 10.0);
        assert!(pb.is_closable());
    }

    #[test]
    fn set_mapper_applies_to_later_moves() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (20.0, 10.0));
        click_drag(&mut pb, (60.0, 60.0), (70.0, 60.0));

        move_to(&mut pb, 16.0, 10.0);
        assert!(pb.is_closable());

        pb.set_mapper(CoordinateMapper::new(3.0, Vec2::new(5.0, 5.0)).unwrap());
        move_to(&mut pb, 16.0, 10.0);
        assert!(!pb.is_closable());
    }

    #[test]
    fn zoom_change_rechecks_the_closing_affordance() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (20.0, 10.0));
        click_drag(&mut pb, (60.0, 60.0), (70.0, 60.0));
        move_to(&mut pb, 16.0, 10.0);
        assert!(pb.is_closable());

        // 6 image px is 18 view px at 3x
        pb.set_mapper(CoordinateMapper::new(3.0, Vec2::new(5.0, 5.0)).unwrap());
        assert!(!pb.is_closable());

        press(&mut pb, 16.0, 10.0);
        assert_ne!(pb.state(), PenState::Closed);
        assert_eq!(pb.path().len(), 3);
        assert!(pb.sink().is_empty());
    }

    #[test]
    fn zooming_out_can_make_the_cursor_closable() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (20.0, 10.0));
        click_drag(&mut pb, (60.0, 60.0), (70.0, 60.0));
        move_to(&mut pb, 26.0, 10.0);
        assert!(!pb.is_closable());

        pb.set_mapper(CoordinateMapper::new(0.5, Vec2::ZERO).unwrap());
        assert!(pb.is_closable());
    }

    // =============================================================
    // Terminal states
    // =============================================================

    #[test]
    fn events_after_close_are_ignored() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        press(&mut pb, 10.0, 10.0);
        assert_eq!(pb.state(), PenState::Closed);
        let closed = pb.path().snapshot();

        press(&mut pb, 300.0, 300.0);
        drag(&mut pb, 310.0, 300.0);
        release(&mut pb, 320.0, 300.0);
        move_to(&mut pb, 10.0, 10.0);
        pb.cancel();
        assert!(!pb.finish());

        assert_eq!(pb.state(), PenState::Closed);
        assert_eq!(pb.path().snapshot(), closed);
        assert_eq!(pb.sink().len(), 1);
    }

    #[test]
    fn finish_ends_an_open_path() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));

        assert!(pb.finish());
        assert_eq!(pb.state(), PenState::Finished);
        assert!(pb.state().is_terminal());
        assert!(!pb.path().is_closed());

        let edit = pb.sink().last().unwrap();
        assert_eq!(edit.kind, EditType::PathFinished);
        assert_eq!(edit.snapshot.anchors.len(), 2);

        press(&mut pb, 0.0, 0.0);
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.sink().len(), 1);
    }

    #[test]
    fn finish_needs_two_anchors() {
        let mut pb = builder();
        assert!(!pb.finish());
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        assert!(!pb.finish());
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert!(pb.sink().is_empty());
    }

    #[test]
    fn finish_while_dragging_fixes_the_handle_first() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        press(&mut pb, 50.0, 50.0);
        drag(&mut pb, 70.0, 50.0);

        assert!(pb.finish());
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.path().anchor(1).unwrap().handle_out_pos(), Point::new(70.0, 50.0));
    }

    // =============================================================
    // Out-of-order events
    // =============================================================

    #[test]
    fn zero_length_drag_gives_degenerate_handle() {
        let mut pb = builder();
        press(&mut pb, 25.0, 25.0);
        release(&mut pb, 25.0, 25.0);
        let anchor = pb.path().anchor(0).unwrap();
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert!(anchor.handle_out().is_degenerate());
        assert!(anchor.handle_in().is_degenerate());
    }

    #[test]
    fn press_while_dragging_releases_at_last_drag_point() {
        let mut pb = builder();
        press(&mut pb, 10.0, 10.0);
        drag(&mut pb, 30.0, 10.0);
        // the release got lost
        press(&mut pb, 60.0, 60.0);

        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.path().anchor(0).unwrap().handle_out_pos(), Point::new(30.0, 10.0));
        assert_eq!(pb.active_anchor(), Some(1));
    }

    #[test]
    fn drag_without_press_presses_first() {
        let mut pb = builder();
        drag(&mut pb, 15.0, 15.0);
        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        assert_eq!(pb.path().len(), 1);
        assert_eq!(pb.path().anchor(0).unwrap().position(), Point::new(15.0, 15.0));
        assert!(pb.path().anchor(0).unwrap().handle_out().is_degenerate());

        drag(&mut pb, 25.0, 15.0);
        assert_eq!(pb.path().anchor(0).unwrap().handle_out_pos(), Point::new(25.0, 15.0));
    }

    #[test]
    fn release_without_press_places_a_corner_anchor() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        release(&mut pb, 80.0, 80.0);
        assert_eq!(pb.state(), PenState::MovingToNextCurvePoint);
        assert_eq!(pb.path().len(), 2);
        assert!(pb.path().anchor(1).unwrap().handle_out().is_degenerate());
    }

    #[test]
    fn drag_without_press_near_first_anchor_closes() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));

        drag(&mut pb, 12.0, 10.0);
        assert_eq!(pb.state(), PenState::Closed);
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.sink().len(), 1);
        assert_eq!(pb.sink().last().unwrap().kind, EditType::PathClosed);
    }

    #[test]
    fn release_without_press_near_first_anchor_closes() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        move_to(&mut pb, 11.0, 10.0);

        release(&mut pb, 11.0, 10.0);
        assert_eq!(pb.state(), PenState::Closed);
        assert!(pb.path().is_closed());
        assert_eq!(pb.path().len(), 2);
        assert_eq!(pb.sink().len(), 1);
    }

    #[test]
    fn move_while_dragging_is_ignored() {
        let mut pb = builder();
        press(&mut pb, 10.0, 10.0);
        drag(&mut pb, 20.0, 10.0);
        move_to(&mut pb, 90.0, 90.0);
        assert_eq!(pb.state(), PenState::DraggingTheControlOfLast);
        assert_eq!(pb.path().anchor(0).unwrap().handle_out_pos(), Point::new(20.0, 10.0));
    }

    // =============================================================
    // Modifiers and preview
    // =============================================================

    #[test]
    fn alt_drag_breaks_symmetry() {
        let mut pb = builder();
        press(&mut pb, 0.0, 0.0);
        drag(&mut pb, 10.0, 0.0);
        let e = ev(&pb, 0.0, 10.0).with_mods(Modifiers::ALT);
        pb.pointer_dragged(e);

        let anchor = pb.path().anchor(0).unwrap();
        assert_eq!(anchor.mode(), HandleMode::Broken);
        assert_eq!(anchor.handle_out_pos(), Point::new(0.0, 10.0));
        assert_eq!(anchor.handle_in_pos(), Point::new(-10.0, 0.0));
    }

    #[test]
    fn shift_drag_snaps_the_handle_angle() {
        let mut pb = builder();
        press(&mut pb, 0.0, 0.0);
        let e = ev(&pb, 10.0, 1.0).with_mods(Modifiers::SHIFT);
        pb.pointer_dragged(e);

        let out = pb.path().anchor(0).unwrap().handle_out_pos();
        assert_abs_diff_eq!(out.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(out.x, 101.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn constrain_angle_snaps_to_diagonal() {
        let p = constrain_angle(Point::ZERO, Point::new(10.0, 9.0), std::f64::consts::FRAC_PI_4);
        assert_abs_diff_eq!(p.x, p.y, epsilon = 1e-9);
        assert_abs_diff_eq!(Point::ZERO.distance(p), Point::ZERO.distance(Point::new(10.0, 9.0)), epsilon = 1e-9);
        assert_eq!(constrain_angle(Point::ZERO, Point::ZERO, 0.5), Point::ZERO);
    }

    #[test]
    fn preview_follows_the_cursor() {
        let mut pb = builder();
        assert!(pb.preview_segment().is_none());
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        move_to(&mut pb, 50.0, 50.0);

        let seg = pb.preview_segment().unwrap();
        assert_eq!(seg.p0, Point::new(10.0, 10.0));
        assert_eq!(seg.p1, Point::new(50.0, 10.0));
        assert_eq!(seg.p3, Point::new(50.0, 50.0));
        assert_eq!(pb.cursor(), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn preview_snaps_to_first_anchor_when_closable() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        move_to(&mut pb, 12.0, 11.0);

        let seg = pb.preview_segment().unwrap();
        assert_eq!(seg.p3, Point::new(10.0, 10.0));
        assert_eq!(seg.p2, Point::new(-30.0, 10.0));
    }

    #[test]
    fn active_anchor_id_tracks_dragged_anchor() {
        let mut pb = builder();
        assert!(pb.active_anchor_id().is_none());
        press(&mut pb, 1.0, 1.0);
        let id = pb.path().anchor(0).unwrap().id();
        assert_eq!(pb.active_anchor_id(), Some(id));
        release(&mut pb, 1.0, 1.0);
        assert!(pb.active_anchor_id().is_none());
    }

    #[test]
    fn into_parts_returns_path_and_sink() {
        let mut pb = builder();
        click_drag(&mut pb, (10.0, 10.0), (50.0, 10.0));
        click_drag(&mut pb, (50.0, 50.0), (90.0, 50.0));
        press(&mut pb, 10.0, 10.0);
        let (path, log) = pb.into_parts();
        assert!(path.is_closed());
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PenConfig {
            close_threshold_px: -2.0,
            ..PenConfig::default()
        };
        assert!(PathBuilder::from_config(&config, EditLog::new()).is_err());
    }
}
