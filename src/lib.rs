// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Bezpen: an interactive pen tool for cubic bezier paths.
//!
//! [`PathBuilder`] turns a stream of pointer events into a [`Path`] of
//! anchors with mirrored control handles. Hosts feed it events already
//! resolved through a [`CoordinateMapper`], render [`PathBuilder::path`]
//! and [`PathBuilder::preview_segment`], and receive one [`PathEdit`]
//! through their [`EditSink`] when the path is closed or finished.

pub mod config;
pub mod editing;
pub mod model;
pub mod path;
pub mod settings;
pub mod tools;

pub use config::{ConfigError, PenConfig};
pub use editing::{
    CoordinateMapper, EditLog, EditSink, EditType, Modifiers, PathEdit, PointerEvent,
    ProximityDetector,
};
pub use model::EntityId;
pub use path::{AnchorPoint, ControlHandle, HandleMode, Path, PathSnapshot};
pub use tools::{PathBuilder, PenState};

/// Install a tracing subscriber controlled by `RUST_LOG`
///
/// Defaults to `bezpen=info`. Calling it twice is harmless.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bezpen=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
