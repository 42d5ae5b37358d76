// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod edit_types;
pub mod history;
pub mod mouse;
pub mod viewport;

pub use edit_types::EditType;
pub use history::{EditLog, EditSink, PathEdit};
pub use hit_test::ProximityDetector;
pub use mouse::{Modifiers, PointerEvent};
pub use viewport::CoordinateMapper;
