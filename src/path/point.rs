// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Anchor points and their control handles.
//!
//! Every anchor owns exactly two handles, `handle_in` (towards the
//! previous segment) and `handle_out` (towards the next). A handle is
//! stored as an offset from its anchor, so moving an anchor carries its
//! handles along. A zero offset is a valid, degenerate handle meaning "no
//! curvature on this side".

use crate::model::EntityId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A control handle, relative to its owning anchor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlHandle {
    offset: Vec2,
}

impl ControlHandle {
    /// A handle sitting on its anchor
    pub const ZERO: ControlHandle = ControlHandle { offset: Vec2::ZERO };

    /// Create a handle from an offset to its anchor
    pub fn from_offset(offset: Vec2) -> Self {
        Self { offset }
    }

    /// Create a handle at an absolute position for an anchor at `anchor`
    pub fn at(anchor: Point, position: Point) -> Self {
        Self {
            offset: position - anchor,
        }
    }

    /// Offset from the owning anchor
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Absolute position, given the owning anchor's position
    pub fn position(&self, anchor: Point) -> Point {
        anchor + self.offset
    }

    /// True if the handle coincides with its anchor
    pub fn is_degenerate(&self) -> bool {
        self.offset == Vec2::ZERO
    }

    /// The handle reflected through the anchor
    pub fn mirrored(&self) -> Self {
        Self {
            offset: -self.offset,
        }
    }
}

/// How the two handles of an anchor relate when one of them moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandleMode {
    /// Moving one handle reflects the other through the anchor
    #[default]
    Symmetric,
    /// Handles move independently
    Broken,
}

/// Reflect `handle` through `anchor`
pub fn mirror_through(anchor: Point, handle: Point) -> Point {
    anchor + (anchor - handle)
}

/// A fixed vertex of a path with its two control handles
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    id: EntityId,
    position: Point,
    handle_in: ControlHandle,
    handle_out: ControlHandle,
    mode: HandleMode,
    is_first: bool,
    /// Closing affordance; never part of an edit snapshot
    active: bool,
}

impl AnchorPoint {
    /// Create an anchor with both handles sitting on it
    pub fn new(position: Point, is_first: bool) -> Self {
        Self::with_id(EntityId::next(), position, is_first)
    }

    pub(crate) fn with_id(id: EntityId, position: Point, is_first: bool) -> Self {
        Self {
            id,
            position,
            handle_in: ControlHandle::ZERO,
            handle_out: ControlHandle::ZERO,
            mode: HandleMode::Symmetric,
            is_first,
            active: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Position in image space
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_first(&self) -> bool {
        self.is_first
    }

    pub(crate) fn set_first(&mut self, is_first: bool) {
        self.is_first = is_first;
    }

    /// Whether the closing affordance is shown on this anchor
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn mode(&self) -> HandleMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: HandleMode) {
        self.mode = mode;
    }

    pub fn handle_in(&self) -> ControlHandle {
        self.handle_in
    }

    pub fn handle_out(&self) -> ControlHandle {
        self.handle_out
    }

    /// Absolute position of the incoming handle
    pub fn handle_in_pos(&self) -> Point {
        self.handle_in.position(self.position)
    }

    /// Absolute position of the outgoing handle
    pub fn handle_out_pos(&self) -> Point {
        self.handle_out.position(self.position)
    }

    /// Place the outgoing handle at `pos`
    ///
    /// In symmetric mode the incoming handle is set to the reflection of
    /// `pos` through the anchor.
    pub fn set_handle_out(&mut self, pos: Point) {
        self.handle_out = ControlHandle::at(self.position, pos);
        if self.mode == HandleMode::Symmetric {
            self.handle_in = self.handle_out.mirrored();
        }
    }

    /// Place the incoming handle at `pos`, mirroring in symmetric mode
    pub fn set_handle_in(&mut self, pos: Point) {
        self.handle_in = ControlHandle::at(self.position, pos);
        if self.mode == HandleMode::Symmetric {
            self.handle_out = self.handle_in.mirrored();
        }
    }

    /// Set both handles directly, without mirroring
    pub(crate) fn set_handles(&mut self, handle_in: ControlHandle, handle_out: ControlHandle) {
        self.handle_in = handle_in;
        self.handle_out = handle_out;
    }

    /// Move the anchor; handles keep their offsets and move with it
    pub fn move_to(&mut self, pos: Point) {
        self.position = pos;
    }

    /// Whether both handles are colinear with the anchor and opposite
    pub fn is_smooth(&self) -> bool {
        let a = self.handle_in.offset();
        let b = self.handle_out.offset();
        if a == Vec2::ZERO || b == Vec2::ZERO {
            return true;
        }
        a.cross(b).abs() <= 1e-9 * a.hypot() * b.hypot() && a.dot(b) < 0.0
    }
}
