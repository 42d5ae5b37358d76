// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Path abstraction for pen-drawn outlines.
//!
//! A `Path` is an ordered list of `AnchorPoint`s plus a closed flag. The
//! order is authoring order and defines the segment order: segment `i`
//! runs from anchor `i` to anchor `i + 1`. A closed path gets one more
//! segment, from the last anchor back to anchor 0.
//!
//! Closing never appends a copy of the first anchor. The end of a closed
//! path *is* anchor 0, so editing that anchor reshapes both the start and
//! the end of the loop.

pub mod point;
pub mod snapshot;

pub use point::{AnchorPoint, ControlHandle, HandleMode};
pub use snapshot::{AnchorSnapshot, PathSnapshot};

use crate::model::EntityId;
use kurbo::{BezPath, CubicBez, Point};

/// An open or closed piecewise cubic bezier path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    anchors: Vec<AnchorPoint>,
    closed: bool,
}

impl Path {
    /// Create an empty, open path
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct anchors
    ///
    /// Closing does not change this count.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// All anchors in authoring order
    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    pub fn anchor(&self, index: usize) -> Option<&AnchorPoint> {
        self.anchors.get(index)
    }

    /// Mutable access for editing tools (e.g. moving an anchor)
    pub fn anchor_mut(&mut self, index: usize) -> Option<&mut AnchorPoint> {
        self.anchors.get_mut(index)
    }

    pub fn first(&self) -> Option<&AnchorPoint> {
        self.anchors.first()
    }

    pub(crate) fn first_mut(&mut self) -> Option<&mut AnchorPoint> {
        self.anchors.first_mut()
    }

    /// Index of the anchor that ends the path
    ///
    /// For a closed path this is 0: the loop ends on its first anchor.
    pub fn end_index(&self) -> Option<usize> {
        if self.anchors.is_empty() {
            None
        } else if self.closed {
            Some(0)
        } else {
            Some(self.anchors.len() - 1)
        }
    }

    /// The anchor that ends the path (the first anchor once closed)
    pub fn end(&self) -> Option<&AnchorPoint> {
        self.end_index().and_then(|i| self.anchors.get(i))
    }

    /// The most recently appended anchor
    pub fn last_appended(&self) -> Option<&AnchorPoint> {
        self.anchors.last()
    }

    /// Find an anchor by id
    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.anchors.iter().position(|a| a.id() == id)
    }

    /// Append an anchor; the first one appended is marked as first
    pub(crate) fn push(&mut self, mut anchor: AnchorPoint) -> usize {
        anchor.set_first(self.anchors.is_empty());
        self.anchors.push(anchor);
        self.anchors.len() - 1
    }

    /// Remove the most recently appended anchor
    pub(crate) fn pop(&mut self) -> Option<AnchorPoint> {
        self.anchors.pop()
    }

    /// Mark the path closed, ending on anchor 0
    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Number of cubic segments
    pub fn segment_count(&self) -> usize {
        match self.anchors.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// The cubic segments in order, including the closing one
    pub fn segments(&self) -> Vec<CubicBez> {
        let n = self.anchors.len();
        (0..self.segment_count())
            .map(|i| segment_between(&self.anchors[i], &self.anchors[(i + 1) % n]))
            .collect()
    }

    /// Convert this path to a kurbo BezPath for rendering
    pub fn to_bezpath(&self) -> BezPath {
        let mut bez = BezPath::new();
        let Some(first) = self.anchors.first() else {
            return bez;
        };
        bez.move_to(first.position());
        for seg in self.segments() {
            bez.curve_to(seg.p1, seg.p2, seg.p3);
        }
        if self.closed {
            bez.close_path();
        }
        bez
    }

    /// Take an immutable value snapshot (for undo)
    pub fn snapshot(&self) -> PathSnapshot {
        PathSnapshot::from_path(self)
    }

    pub(crate) fn from_parts(anchors: Vec<AnchorPoint>, closed: bool) -> Self {
        Self { anchors, closed }
    }
}

/// The cubic from `from` to `to`, using `from`'s outgoing and `to`'s
/// incoming handle
pub fn segment_between(from: &AnchorPoint, to: &AnchorPoint) -> CubicBez {
    CubicBez::new(
        from.position(),
        from.handle_out_pos(),
        to.handle_in_pos(),
        to.position(),
    )
}

/// The in-progress segment from `from` to a free cursor position
pub fn preview_segment(from: &AnchorPoint, cursor: Point) -> CubicBez {
    CubicBez::new(from.position(), from.handle_out_pos(), cursor, cursor)
}
