// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Default settings for the pen tool.
//!
//! These are the compile-time defaults. A host can override the ones that
//! are part of `PenConfig` when it builds a `PathBuilder`; the rest are
//! fixed.

// ============================================================================
// VIEW SETTINGS
// ============================================================================
/// Default zoom level (image pixels map 1:1 to view pixels)
const DEFAULT_ZOOM: f64 = 1.0;

// ============================================================================
// PEN SETTINGS
// ============================================================================
/// Distance in view pixels within which a press closes the path
const CLOSE_PATH_THRESHOLD: f64 = 10.0;

/// Angle step for Shift-constrained handle dragging (degrees)
const ANGLE_SNAP_DEGREES: f64 = 45.0;

/// Minimum anchors a path needs before it can be closed or finished
const MIN_ANCHORS_TO_COMPLETE: usize = 2;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// View transform defaults
pub mod view {
    /// Zoom used when no config is given
    pub const DEFAULT_ZOOM: f64 = super::DEFAULT_ZOOM;
}

/// Pen tool defaults
pub mod pen {
    /// Closing threshold in view pixels
    pub const CLOSE_PATH_THRESHOLD: f64 = super::CLOSE_PATH_THRESHOLD;

    /// Shift-drag angle step in degrees
    pub const ANGLE_SNAP_DEGREES: f64 = super::ANGLE_SNAP_DEGREES;

    /// A path needs this many anchors to be closed or finished
    pub const MIN_ANCHORS_TO_COMPLETE: usize = super::MIN_ANCHORS_TO_COMPLETE;
}
