// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer events as seen by the pen tool.
//!
//! Each event carries the pointer in both coordinate spaces: image space
//! for geometry, view space for distance thresholds. Hosts usually build
//! them from a raw view position with [`PointerEvent::from_view`].

use super::viewport::CoordinateMapper;
use kurbo::Point;

/// Modifier keys held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Constrain the handle angle
    pub shift: bool,
    /// Break handle symmetry
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Self::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Self::NONE
    };
}

/// A pointer event, resolved to image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in image space
    pub pos: Point,
    /// Position in view space (screen pixels)
    pub view_pos: Point,
    /// Modifier keys held
    pub mods: Modifiers,
}

impl PointerEvent {
    /// Build an event from a view-space position
    pub fn from_view(view_pos: Point, mapper: &CoordinateMapper) -> Self {
        Self {
            pos: mapper.to_image(view_pos),
            view_pos,
            mods: Modifiers::NONE,
        }
    }

    /// Build an event from an image-space position
    pub fn from_image(pos: Point, mapper: &CoordinateMapper) -> Self {
        Self {
            pos,
            view_pos: mapper.to_view(pos),
            mods: Modifiers::NONE,
        }
    }

    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }
}
