// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pen tool configuration.
//!
//! `PenConfig` is read once when the tool is set up, either from defaults
//! or from a TOML file. Everything is validated up front: an invalid zoom
//! or threshold is rejected here and never shows up mid-interaction.

use crate::editing::viewport::CoordinateMapper;
use crate::settings;
use kurbo::Vec2;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while building or loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Zoom must be a positive, finite number
    #[error("invalid zoom factor {0}: must be positive and finite")]
    InvalidZoom(f64),

    /// The closing threshold must be a non-negative, finite distance
    #[error("invalid closing threshold {0}: must be non-negative and finite")]
    InvalidThreshold(f64),

    /// The angle snap step must be positive and finite
    #[error("invalid angle snap step {0}: must be positive and finite")]
    InvalidAngleSnap(f64),

    /// Offsets must be finite
    #[error("invalid view offset ({0}, {1}): must be finite")]
    InvalidOffset(f64, f64),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for a pen tool session
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PenConfig {
    /// Closing threshold in view pixels
    pub close_threshold_px: f64,

    /// Step for Shift-constrained handle angles, in degrees
    pub angle_snap_degrees: f64,

    /// Initial view zoom
    pub zoom: f64,

    /// Initial view scroll offset, in view pixels
    pub offset: [f64; 2],
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            close_threshold_px: settings::pen::CLOSE_PATH_THRESHOLD,
            angle_snap_degrees: settings::pen::ANGLE_SNAP_DEGREES,
            zoom: settings::view::DEFAULT_ZOOM,
            offset: [0.0, 0.0],
        }
    }
}

impl PenConfig {
    /// Parse and validate a TOML config
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PenConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading pen config: {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check every value against its precondition
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.close_threshold_px.is_finite() || self.close_threshold_px < 0.0 {
            return Err(ConfigError::InvalidThreshold(self.close_threshold_px));
        }
        if !self.angle_snap_degrees.is_finite() || self.angle_snap_degrees <= 0.0 {
            return Err(ConfigError::InvalidAngleSnap(self.angle_snap_degrees));
        }
        // Mapper construction checks zoom and offset
        self.mapper().map(|_| ())
    }

    /// Build the initial coordinate mapper described by this config
    pub fn mapper(&self) -> Result<CoordinateMapper, ConfigError> {
        CoordinateMapper::new(self.zoom, Vec2::new(self.offset[0], self.offset[1]))
    }
}
