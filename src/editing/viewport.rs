// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! View transform between view space (screen pixels) and image space.
//!
//! `view = image * zoom + offset`. The mapper holds no other state; the
//! view owns zoom and scroll and hands the pen tool a fresh mapper when
//! either changes.

use crate::config::ConfigError;
use kurbo::{Affine, Point, Vec2};

/// Converts points between view space and image space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    zoom: f64,
    offset: Vec2,
}

impl CoordinateMapper {
    /// Create a mapper, rejecting zoom factors that are not positive and
    /// finite
    pub fn new(zoom: f64, offset: Vec2) -> Result<Self, ConfigError> {
        check_zoom(zoom)?;
        if !offset.is_finite() {
            return Err(ConfigError::InvalidOffset(offset.x, offset.y));
        }
        Ok(Self { zoom, offset })
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current scroll offset in view pixels
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Change the zoom factor
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), ConfigError> {
        check_zoom(zoom)?;
        self.zoom = zoom;
        Ok(())
    }

    /// Change the scroll offset
    pub fn set_offset(&mut self, offset: Vec2) -> Result<(), ConfigError> {
        if !offset.is_finite() {
            return Err(ConfigError::InvalidOffset(offset.x, offset.y));
        }
        self.offset = offset;
        Ok(())
    }

    /// Image-to-view transform, for renderers
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a view-space point to image space
    pub fn to_image(&self, view: Point) -> Point {
        Point::new(
            (view.x - self.offset.x) / self.zoom,
            (view.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert an image-space point to view space
    pub fn to_view(&self, image: Point) -> Point {
        Point::new(
            image.x * self.zoom + self.offset.x,
            image.y * self.zoom + self.offset.y,
        )
    }

    /// Convert a view-space distance to an image-space distance
    pub fn view_dist_to_image(&self, view_dist: f64) -> f64 {
        view_dist / self.zoom
    }
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

fn check_zoom(zoom: f64) -> Result<(), ConfigError> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidZoom(zoom))
    }
}
